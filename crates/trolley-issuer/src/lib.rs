// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Standalone payment-token issuance service.
//!
//! Speaks a Stripe-shaped wire format: form-encoded issuance requests,
//! JSON token objects, and `{"error": {...}}` envelopes. Tokens live in
//! process memory and vanish on restart, which is the intended lifecycle
//! for a local demo issuer.

pub mod handlers;
pub mod server;
pub mod store;

pub use handlers::{HealthResponse, IssuedTokenResponse, IssuerState};
pub use server::{router, start_server, ServerConfig};
pub use store::{MemoryTokenStore, SellerDetails, SharedPaymentToken, TokenStore, UsageLimits};
