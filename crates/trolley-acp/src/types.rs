// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Checkout-session protocol wire types.
//!
//! These mirror the seller backend's JSON shapes. The session is owned by
//! the seller; this crate holds typed views that re-serialize without
//! introducing fields the seller never sent (`skip_serializing_if` on every
//! optional), since bridge responses pass seller payloads through verbatim.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a checkout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStatus {
    NotReadyForPayment,
    ReadyForPayment,
    Completed,
    Canceled,
    InProgress,
}

/// Kind tag of one totals entry.
///
/// `Total` is the authoritative charge amount; everything else is a
/// breakdown component and must never be charged directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalType {
    ItemsBaseAmount,
    ItemsDiscount,
    Subtotal,
    Discount,
    Fulfillment,
    Tax,
    Fee,
    Total,
}

/// One (kind, amount) pair in a session's totals breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalEntry {
    #[serde(rename = "type")]
    pub total_type: TotalType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
    /// Amount in minor currency units (cents).
    pub amount: i64,
}

/// A requested (product id, quantity) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSelection {
    pub id: String,
    pub quantity: u32,
}

/// A priced line within a checkout session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub item: ItemSelection,
    pub base_amount: i64,
    pub discount: i64,
    pub subtotal: i64,
    pub tax: i64,
    pub total: i64,
}

/// Buyer contact details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buyer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// A fulfillment or billing address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_one: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_two: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// Order reference present on a completed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub id: String,
    pub checkout_session_id: String,
    pub permalink_url: String,
}

/// A checkout session as the seller reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub status: CheckoutStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer: Option<Buyer>,
    /// Seller-defined payment provider descriptor; passed through opaque.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_provider: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfillment_address: Option<Address>,
    /// Seller-defined fulfillment option descriptors; passed through opaque.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fulfillment_options: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfillment_option_id: Option<String>,
    #[serde(default)]
    pub totals: Vec<TotalEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderDetails>,
}

impl CheckoutSession {
    /// The authoritative charge amount: the totals entry of kind `total`.
    ///
    /// Returns `None` when the seller reported no such entry; callers must
    /// not substitute `subtotal` or any other kind.
    pub fn total_amount(&self) -> Option<i64> {
        self.totals
            .iter()
            .find(|t| t.total_type == TotalType::Total)
            .map(|t| t.amount)
    }
}

/// One product in the seller's catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Price per unit in minor currency units (cents).
    pub price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// The seller's product listing response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCatalog {
    pub products: Vec<Product>,
}

/// Body for `POST /checkout_sessions`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCheckoutRequest {
    pub items: Vec<ItemSelection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer: Option<Buyer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfillment_address: Option<Address>,
}

/// Partial update for an existing session.
///
/// Omitted fields are absent from the request body entirely, so the seller
/// leaves them untouched rather than clearing them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ItemSelection>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer: Option<Buyer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfillment_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfillment_option_id: Option<String>,
}

/// The `payment_data` object inside a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentData {
    /// Exchanged shared-payment-token identifier, never a raw credential.
    pub token: String,
    pub provider: String,
}

/// Body for `POST /checkout_sessions/{id}/complete`.
#[derive(Debug, Clone, Serialize)]
pub struct CompleteCheckoutRequest {
    pub payment_data: PaymentData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
}
