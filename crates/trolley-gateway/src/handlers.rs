// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the chat-bridge REST API.
//!
//! Catalog and checkout routes are thin passthroughs to the seller client;
//! completion and token exchange go through the payment orchestrator; /chat
//! drives the conversational engine. Validation happens here, before any
//! outbound call.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use trolley_acp::{Address, Buyer, CheckoutUpdate, CreateCheckoutRequest, ItemSelection};
use trolley_core::{ChatMessage, TrolleyError};

use crate::server::BridgeState;

/// Request body for POST /checkout/create.
#[derive(Debug, Deserialize)]
pub struct CreateCheckoutBody {
    /// Items to purchase. The key itself is required; content validation
    /// happens in the seller client.
    #[serde(default)]
    pub items: Option<Vec<ItemSelection>>,
    /// Optional buyer information.
    #[serde(default)]
    pub buyer: Option<Buyer>,
    /// Optional shipping address.
    #[serde(default)]
    pub fulfillment_address: Option<Address>,
}

/// Request body for POST /checkout/{id}/complete.
#[derive(Debug, Deserialize)]
pub struct CompleteCheckoutBody {
    /// Raw payment credential; exchanged for a scoped token before the
    /// seller sees a completion request.
    #[serde(default)]
    pub payment_token: Option<String>,
    /// Payment provider name. Defaults to the orchestrator's provider.
    #[serde(default)]
    pub payment_provider: Option<String>,
    /// Optional billing address.
    #[serde(default)]
    pub billing_address: Option<Address>,
}

/// Request body for POST /chat.
#[derive(Debug, Deserialize)]
pub struct ChatBody {
    /// Full conversation history in chat-completions order.
    #[serde(default)]
    pub messages: Option<Vec<ChatMessage>>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Maps a failed upstream operation onto the HTTP surface.
///
/// Validation failures are the caller's fault regardless of route; transport
/// failures reuse the status the upstream answered with when one exists;
/// everything else falls back to the route's default.
fn upstream_error(err: TrolleyError, default_status: StatusCode) -> Response {
    let status = match &err {
        TrolleyError::Validation { .. } => StatusCode::BAD_REQUEST,
        _ => err
            .upstream_status()
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(default_status),
    };
    error_response(status, err.to_string())
}

/// GET /products
///
/// Returns the seller's catalog unchanged.
pub async fn list_products(State(state): State<BridgeState>) -> Response {
    match state.acp.list_products().await {
        Ok(catalog) => (StatusCode::OK, Json(catalog)).into_response(),
        Err(err) => upstream_error(err, StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /checkout/create
///
/// Creates a checkout session from the requested items.
pub async fn create_checkout(
    State(state): State<BridgeState>,
    Json(body): Json<CreateCheckoutBody>,
) -> Response {
    let Some(items) = body.items else {
        return error_response(StatusCode::BAD_REQUEST, "Items are required");
    };

    let request = CreateCheckoutRequest {
        items,
        buyer: body.buyer,
        fulfillment_address: body.fulfillment_address,
    };
    match state.acp.create_checkout(&request).await {
        Ok(session) => (StatusCode::CREATED, Json(session)).into_response(),
        Err(err) => upstream_error(err, StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// GET /checkout/{checkout_id}
pub async fn get_checkout(
    State(state): State<BridgeState>,
    Path(checkout_id): Path<String>,
) -> Response {
    match state.acp.get_checkout(&checkout_id).await {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(err) => upstream_error(err, StatusCode::NOT_FOUND),
    }
}

/// PUT /checkout/{checkout_id}/update
///
/// Forwards whichever fields arrived; omitted fields stay untouched on the
/// seller side.
pub async fn update_checkout(
    State(state): State<BridgeState>,
    Path(checkout_id): Path<String>,
    Json(update): Json<CheckoutUpdate>,
) -> Response {
    match state.acp.update_checkout(&checkout_id, &update).await {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(err) => upstream_error(err, StatusCode::BAD_REQUEST),
    }
}

/// POST /checkout/{checkout_id}/complete
///
/// Completes a checkout. The raw credential never reaches the seller; the
/// orchestrator exchanges it for a token scoped to the session total first.
pub async fn complete_checkout(
    State(state): State<BridgeState>,
    Path(checkout_id): Path<String>,
    Json(body): Json<CompleteCheckoutBody>,
) -> Response {
    let Some(payment_token) = body.payment_token else {
        return error_response(StatusCode::BAD_REQUEST, "Payment token is required");
    };

    match state
        .orchestrator
        .complete_with_payment(
            &checkout_id,
            &payment_token,
            body.payment_provider.as_deref(),
            body.billing_address,
        )
        .await
    {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(err) => upstream_error(err, StatusCode::BAD_REQUEST),
    }
}

/// POST /checkout/{checkout_id}/cancel
pub async fn cancel_checkout(
    State(state): State<BridgeState>,
    Path(checkout_id): Path<String>,
) -> Response {
    match state.acp.cancel_checkout(&checkout_id).await {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(err) => upstream_error(err, StatusCode::BAD_REQUEST),
    }
}

/// POST /chat
///
/// Runs one conversation turn. Model outages degrade to a fixed assistant
/// message inside the engine, so this route only fails on a missing
/// `messages` key.
pub async fn chat(State(state): State<BridgeState>, Json(body): Json<ChatBody>) -> Response {
    let Some(messages) = body.messages else {
        return error_response(StatusCode::BAD_REQUEST, "Messages are required");
    };

    let reply = state.engine.process(messages).await;
    (StatusCode::OK, Json(reply)).into_response()
}

/// POST /exchange_token
///
/// Exchanges a raw payment credential for a scoped shared payment token.
/// The amount is validated here because issuance binds it as a hard cap.
pub async fn exchange_token(State(state): State<BridgeState>, Json(body): Json<Value>) -> Response {
    let Some(token_value) = body.get("payment_token") else {
        return error_response(StatusCode::BAD_REQUEST, "payment_token is required");
    };
    let Some(amount_value) = body.get("amount") else {
        return error_response(StatusCode::BAD_REQUEST, "amount is required");
    };
    let Some(amount) = amount_value.as_i64() else {
        return error_response(StatusCode::BAD_REQUEST, "amount must be an integer");
    };
    let Some(payment_token) = token_value.as_str() else {
        return error_response(StatusCode::BAD_REQUEST, "payment_token must be a string");
    };

    match state
        .orchestrator
        .exchange_raw_token(payment_token, amount)
        .await
    {
        Ok(spt_token) => (StatusCode::OK, Json(json!({ "spt_token": spt_token }))).into_response(),
        Err(err) => upstream_error(err, StatusCode::INTERNAL_SERVER_ERROR),
    }
}
