// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payment-token exchange and checkout completion for the Trolley bridge.
//!
//! Raw payment credentials stop at this crate: [`SptExchange`] trades them
//! for scoped shared payment tokens, and [`CheckoutOrchestrator`] binds the
//! token to a session's authoritative total before the seller is asked to
//! complete.

pub mod exchange;
pub mod orchestrator;

pub use crate::exchange::{IssuedToken, SellerBinding, SptExchange};
pub use crate::orchestrator::{CheckoutOrchestrator, DEFAULT_PROVIDER};
