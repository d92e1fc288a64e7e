// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for the shared-payment-token issuance API.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use trolley_core::TrolleyError;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Merchant identity bound into every issued token.
///
/// These come from configuration, never from request input, so a caller
/// cannot mint a token scoped to a different seller.
#[derive(Debug, Clone)]
pub struct SellerBinding {
    pub network_id: String,
    pub external_id: String,
}

/// Issuance response; `id` is the scoped token identifier.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuedToken {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub livemode: bool,
}

/// Issuance request body. The issuer speaks Stripe-style bracketed form
/// fields, not JSON.
#[derive(Debug, Serialize)]
struct IssueTokenForm<'a> {
    payment_method: &'a str,
    #[serde(rename = "usage_limits[currency]")]
    currency: &'a str,
    #[serde(rename = "usage_limits[max_amount]")]
    max_amount: i64,
    #[serde(rename = "usage_limits[expires_at]")]
    expires_at: i64,
    #[serde(rename = "seller_details[network_id]")]
    network_id: &'a str,
    #[serde(rename = "seller_details[external_id]")]
    external_id: &'a str,
}

/// Client for one token issuance endpoint.
pub struct SptExchange {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SptExchange {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, TrolleyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TrolleyError::Transport {
                message: "failed to build issuance HTTP client".to_string(),
                status: None,
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// `POST /v1/shared_payment/issued_tokens`
    ///
    /// Exchanges a raw payment credential for a token capped at `amount`
    /// and bound to `binding`. The raw credential appears only in this
    /// request; callers must use the returned id from here on.
    pub async fn issue_token(
        &self,
        payment_method: &str,
        amount: i64,
        currency: &str,
        expires_at: i64,
        binding: &SellerBinding,
    ) -> Result<IssuedToken, TrolleyError> {
        debug!(amount, currency, "issuing shared payment token");
        let form = IssueTokenForm {
            payment_method,
            currency,
            max_amount: amount,
            expires_at,
            network_id: &binding.network_id,
            external_id: &binding.external_id,
        };
        let response = self
            .client
            .post(format!(
                "{}/v1/shared_payment/issued_tokens",
                self.base_url
            ))
            .basic_auth(&self.api_key, Some(""))
            .form(&form)
            .send()
            .await
            .map_err(|e| TrolleyError::Transport {
                message: "token issuance request failed".to_string(),
                status: None,
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| TrolleyError::Transport {
            message: "failed to read token issuance response".to_string(),
            status: Some(status.as_u16()),
            source: Some(Box::new(e)),
        })?;
        if !status.is_success() {
            return Err(TrolleyError::Transport {
                message: format!(
                    "token issuance returned {}: {}",
                    status.as_u16(),
                    body.trim()
                ),
                status: Some(status.as_u16()),
                source: None,
            });
        }
        let issued: IssuedToken = serde_json::from_str(&body)?;
        debug!(token = %issued.id, "shared payment token issued");
        Ok(issued)
    }
}
