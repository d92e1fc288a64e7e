// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fixed commerce action set and its argument parsing.

use serde::Deserialize;
use serde_json::json;
use trolley_core::{ToolCall, ToolSchema, TrolleyError};

/// Arguments for `add_to_cart`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddToCartArgs {
    pub item_id: String,
}

/// Arguments for `complete_checkout`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompleteCheckoutArgs {
    pub checkout_id: String,
    pub payment_token: String,
}

/// One recognized tool call, arguments already parsed and validated.
///
/// The model's `arguments` string is decoded exactly once, here; the loop
/// body never touches raw argument JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolAction {
    ListProducts,
    AddToCart(AddToCartArgs),
    StartCheckout,
    CompleteCheckout(CompleteCheckoutArgs),
}

impl ToolAction {
    /// Decodes a model tool call into an action.
    ///
    /// Unrecognized names fail with [`TrolleyError::UnknownAction`];
    /// missing or malformed arguments fail with a serialization error.
    /// Callers turn either into a tool error payload, never a crash.
    pub fn parse(call: &ToolCall) -> Result<Self, TrolleyError> {
        let arguments = call.function.arguments.as_str();
        match call.function.name.as_str() {
            "list_products" => Ok(Self::ListProducts),
            "add_to_cart" => Ok(Self::AddToCart(serde_json::from_str(arguments)?)),
            "start_checkout" => Ok(Self::StartCheckout),
            "complete_checkout" => Ok(Self::CompleteCheckout(serde_json::from_str(arguments)?)),
            other => Err(TrolleyError::UnknownAction {
                name: other.to_string(),
            }),
        }
    }
}

/// The tool schemas advertised to the model on every completion request.
pub fn commerce_tools() -> Vec<ToolSchema> {
    vec![
        ToolSchema::function(
            "list_products",
            "Get a list of available drinks from the catalog. Use this when the user asks to see drinks or what is for sale.",
            json!({"type": "object", "properties": {}, "required": []}),
        ),
        ToolSchema::function(
            "add_to_cart",
            "Add a product to the user's shopping cart. Use this when the user explicitly wants to buy a specific item.",
            json!({
                "type": "object",
                "properties": {
                    "item_id": {
                        "type": "string",
                        "description": "The ID of the product to add to cart (e.g., 'item_1')"
                    }
                },
                "required": ["item_id"]
            }),
        ),
        ToolSchema::function(
            "start_checkout",
            "Initiate the checkout process. Use this when the user says they are ready to checkout or buy the items in their cart.",
            json!({"type": "object", "properties": {}, "required": []}),
        ),
        ToolSchema::function(
            "complete_checkout",
            "Complete the checkout process using a payment token. Use this ONLY when the user provides a payment token and checkout ID.",
            json!({
                "type": "object",
                "properties": {
                    "checkout_id": {
                        "type": "string",
                        "description": "The ID of the checkout session"
                    },
                    "payment_token": {
                        "type": "string",
                        "description": "The payment token provided by the user/frontend"
                    }
                },
                "required": ["checkout_id", "payment_token"]
            }),
        ),
    ]
}
