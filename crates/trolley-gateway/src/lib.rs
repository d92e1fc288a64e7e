// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat-bridge HTTP server.
//!
//! Exposes the REST surface the shop frontend talks to: catalog listing,
//! checkout session lifecycle, conversational chat, and payment-token
//! exchange. Checkout routes pass seller payloads through verbatim so the
//! frontend sees exactly what the seller said.

pub mod handlers;
pub mod server;

pub use handlers::ErrorResponse;
pub use server::{router, start_server, BridgeState, ServerConfig};
