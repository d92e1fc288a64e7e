// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the token issuance API.
//!
//! Wire format is Stripe-shaped: bracketed form fields in, JSON envelopes
//! out, errors as `{"error": {"type", "code", "message"}}`.

use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::store::{SellerDetails, SharedPaymentToken, TokenStore, UsageLimits};

const TOKEN_ID_PREFIX: &str = "spt_";
const TOKEN_ID_BYTES: usize = 12;

/// Shared state for issuance handlers.
#[derive(Clone)]
pub struct IssuerState {
    /// Token storage; injected so it can be swapped out.
    pub store: Arc<dyn TokenStore>,
    /// Currency applied when the request names none.
    pub default_currency: String,
}

/// Form body for POST /v1/shared_payment/issued_tokens.
///
/// Every field is optional at the decoding layer; validation happens in
/// the handler so missing fields produce wire-format errors, not a 422.
/// Numeric fields arrive as strings and are parsed explicitly.
#[derive(Debug, Default, Deserialize)]
pub struct IssueTokenForm {
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default, rename = "usage_limits[currency]")]
    pub currency: Option<String>,
    #[serde(default, rename = "usage_limits[max_amount]")]
    pub max_amount: Option<String>,
    #[serde(default, rename = "usage_limits[expires_at]")]
    pub expires_at: Option<String>,
    #[serde(default, rename = "seller_details[network_id]")]
    pub network_id: Option<String>,
    #[serde(default, rename = "seller_details[external_id]")]
    pub external_id: Option<String>,
}

/// Success body for token issuance.
#[derive(Debug, Serialize)]
pub struct IssuedTokenResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub livemode: bool,
}

/// Success body for token resolution.
#[derive(Debug, Serialize)]
pub struct GrantedTokenResponse {
    pub id: String,
    pub object: String,
    pub payment_method: String,
    pub usage_limits: UsageLimits,
    pub seller_details: SellerDetails,
    pub created: i64,
    pub status: String,
    pub livemode: bool,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub active_tokens: usize,
}

/// Error envelope in the issuance wire format.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    #[serde(rename = "type")]
    pub error_type: String,
    pub code: String,
    pub message: String,
}

fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(ErrorEnvelope {
            error: ErrorDetails {
                error_type: "invalid_request".to_string(),
                code: code.to_string(),
                message: message.to_string(),
            },
        }),
    )
        .into_response()
}

/// Empty or absent form numbers mean "no limit"; anything else must parse.
fn parse_form_int(value: Option<&str>, field: &str) -> Result<Option<i64>, Response> {
    match value {
        None => Ok(None),
        Some("") => Ok(None),
        Some(raw) => raw.parse::<i64>().map(Some).map_err(|_| {
            error_response(
                StatusCode::BAD_REQUEST,
                "parameter_invalid_integer",
                &format!("{field} must be an integer"),
            )
        }),
    }
}

/// 96 random bits per id; uniqueness is probabilistic, no collision check.
fn generate_token_id() -> String {
    let mut bytes = [0u8; TOKEN_ID_BYTES];
    OsRng.fill_bytes(&mut bytes);
    format!("{TOKEN_ID_PREFIX}{}", hex::encode(bytes))
}

/// POST /v1/shared_payment/issued_tokens
///
/// Issues a fresh token. `payment_method` is the only required field;
/// everything else defaults or stays unset.
pub async fn issue_token(
    State(state): State<IssuerState>,
    Form(form): Form<IssueTokenForm>,
) -> Response {
    let Some(payment_method) = form.payment_method.as_deref().filter(|pm| !pm.is_empty())
    else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "missing_payment_method",
            "payment_method is required",
        );
    };

    let max_amount = match parse_form_int(form.max_amount.as_deref(), "usage_limits[max_amount]")
    {
        Ok(value) => value,
        Err(response) => return response,
    };
    let expires_at = match parse_form_int(form.expires_at.as_deref(), "usage_limits[expires_at]")
    {
        Ok(value) => value,
        Err(response) => return response,
    };
    let currency = form
        .currency
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| state.default_currency.clone());

    let id = generate_token_id();
    let created = Utc::now().timestamp();
    state.store.put(SharedPaymentToken {
        id: id.clone(),
        payment_method: payment_method.to_string(),
        usage_limits: UsageLimits {
            currency,
            max_amount,
            expires_at,
        },
        seller_details: SellerDetails {
            network_id: form.network_id,
            external_id: form.external_id,
        },
        created,
        status: "active".to_string(),
    });
    info!(%id, payment_method, ?max_amount, "issued shared payment token");

    (
        StatusCode::CREATED,
        Json(IssuedTokenResponse {
            id,
            object: "shared_payment.issued_token".to_string(),
            created,
            livemode: false,
        }),
    )
        .into_response()
}

/// GET /v1/shared_payment/granted_tokens/{spt_id}
///
/// Returns the stored record, refusing expired tokens at read time.
pub async fn resolve_token(
    State(state): State<IssuerState>,
    Path(spt_id): Path<String>,
) -> Response {
    let Some(token) = state.store.get(&spt_id) else {
        return error_response(
            StatusCode::NOT_FOUND,
            "spt_not_found",
            &format!("Shared payment token {spt_id} not found"),
        );
    };

    if token.is_expired(Utc::now().timestamp()) {
        return error_response(
            StatusCode::BAD_REQUEST,
            "spt_expired",
            "Shared payment token has expired",
        );
    }
    debug!(%spt_id, "resolved shared payment token");

    (
        StatusCode::OK,
        Json(GrantedTokenResponse {
            id: token.id,
            object: "shared_payment.granted_token".to_string(),
            payment_method: token.payment_method,
            usage_limits: token.usage_limits,
            seller_details: token.seller_details,
            created: token.created,
            status: token.status,
            livemode: false,
        }),
    )
        .into_response()
}

/// GET /health
pub async fn health(State(state): State<IssuerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "trolley-issuer".to_string(),
        active_tokens: state.store.len(),
    })
}
