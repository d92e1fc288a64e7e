// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seller-side checkout protocol client for the Trolley bridge.
//!
//! Wraps the seller backend's product catalog and checkout-session API
//! behind [`AcpClient`]. All session state lives on the seller; this crate
//! only shuttles typed requests and responses.

pub mod client;
pub mod types;

pub use crate::client::{AcpClient, API_VERSION};
pub use crate::types::{
    Address, Buyer, CheckoutSession, CheckoutStatus, CheckoutUpdate, CompleteCheckoutRequest,
    CreateCheckoutRequest, ItemSelection, LineItem, OrderDetails, PaymentData, Product,
    ProductCatalog, TotalEntry, TotalType,
};
