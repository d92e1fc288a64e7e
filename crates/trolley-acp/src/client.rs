// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the seller's checkout-session API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::debug;
use trolley_core::TrolleyError;

use crate::types::{
    Address, CheckoutSession, CheckoutUpdate, CompleteCheckoutRequest, CreateCheckoutRequest,
    PaymentData, ProductCatalog,
};

/// Version pin sent on every seller request.
pub const API_VERSION: &str = "2025-09-29";

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for one seller backend.
///
/// Auth and version headers are fixed at construction; every call carries
/// them. Requests are bounded by a 30 second timeout and are never retried,
/// since checkout mutations are not idempotent.
pub struct AcpClient {
    client: reqwest::Client,
    base_url: String,
}

impl AcpClient {
    pub fn new(base_url: &str, api_key: &str, api_version: &str) -> Result<Self, TrolleyError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| TrolleyError::Config("seller.api_key contains invalid header characters".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        let version = HeaderValue::from_str(api_version)
            .map_err(|_| TrolleyError::Config("seller.api_version contains invalid header characters".to_string()))?;
        headers.insert("API-Version", version);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TrolleyError::Transport {
                message: "failed to build seller HTTP client".to_string(),
                status: None,
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `GET /products`
    pub async fn list_products(&self) -> Result<ProductCatalog, TrolleyError> {
        debug!("fetching product catalog");
        let response = self
            .client
            .get(format!("{}/products", self.base_url))
            .send()
            .await
            .map_err(|e| send_error("list products", e))?;
        read_json(response, "list products").await
    }

    /// `POST /checkout_sessions`
    ///
    /// Rejects an empty item list or a zero quantity before any request is
    /// sent, so a malformed cart never reaches the seller.
    pub async fn create_checkout(
        &self,
        request: &CreateCheckoutRequest,
    ) -> Result<CheckoutSession, TrolleyError> {
        if request.items.is_empty() {
            return Err(TrolleyError::Validation {
                message: "Items are required".to_string(),
            });
        }
        if request.items.iter().any(|item| item.quantity == 0) {
            return Err(TrolleyError::Validation {
                message: "Item quantity must be at least 1".to_string(),
            });
        }
        debug!(items = request.items.len(), "creating checkout session");
        let response = self
            .client
            .post(format!("{}/checkout_sessions", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| send_error("create checkout", e))?;
        read_json(response, "create checkout").await
    }

    /// `GET /checkout_sessions/{id}`
    pub async fn get_checkout(&self, checkout_id: &str) -> Result<CheckoutSession, TrolleyError> {
        debug!(checkout_id, "fetching checkout session");
        let response = self
            .client
            .get(format!("{}/checkout_sessions/{checkout_id}", self.base_url))
            .send()
            .await
            .map_err(|e| send_error("get checkout", e))?;
        read_json(response, "get checkout").await
    }

    /// `POST /checkout_sessions/{id}`
    ///
    /// Partial update: only the fields set in `update` appear in the body.
    pub async fn update_checkout(
        &self,
        checkout_id: &str,
        update: &CheckoutUpdate,
    ) -> Result<CheckoutSession, TrolleyError> {
        debug!(checkout_id, "updating checkout session");
        let response = self
            .client
            .post(format!("{}/checkout_sessions/{checkout_id}", self.base_url))
            .json(update)
            .send()
            .await
            .map_err(|e| send_error("update checkout", e))?;
        read_json(response, "update checkout").await
    }

    /// `POST /checkout_sessions/{id}/complete`
    pub async fn complete_checkout(
        &self,
        checkout_id: &str,
        token: &str,
        provider: &str,
        billing_address: Option<Address>,
    ) -> Result<CheckoutSession, TrolleyError> {
        debug!(checkout_id, provider, "completing checkout session");
        let body = CompleteCheckoutRequest {
            payment_data: PaymentData {
                token: token.to_string(),
                provider: provider.to_string(),
            },
            billing_address,
        };
        let response = self
            .client
            .post(format!(
                "{}/checkout_sessions/{checkout_id}/complete",
                self.base_url
            ))
            .json(&body)
            .send()
            .await
            .map_err(|e| send_error("complete checkout", e))?;
        read_json(response, "complete checkout").await
    }

    /// `POST /checkout_sessions/{id}/cancel`
    pub async fn cancel_checkout(
        &self,
        checkout_id: &str,
    ) -> Result<CheckoutSession, TrolleyError> {
        debug!(checkout_id, "canceling checkout session");
        let response = self
            .client
            .post(format!(
                "{}/checkout_sessions/{checkout_id}/cancel",
                self.base_url
            ))
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| send_error("cancel checkout", e))?;
        read_json(response, "cancel checkout").await
    }
}

fn send_error(context: &str, err: reqwest::Error) -> TrolleyError {
    TrolleyError::Transport {
        message: format!("{context} request failed"),
        status: None,
        source: Some(Box::new(err)),
    }
}

/// Checks the status, then deserializes the body.
///
/// A non-2xx status becomes `Transport` carrying the upstream code so the
/// bridge can forward it. A 2xx body that fails to parse becomes
/// `Serialization` instead, never a status-bearing error.
async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    context: &str,
) -> Result<T, TrolleyError> {
    let status = response.status();
    let body = response.text().await.map_err(|e| TrolleyError::Transport {
        message: format!("failed to read {context} response"),
        status: Some(status.as_u16()),
        source: Some(Box::new(e)),
    })?;
    if !status.is_success() {
        return Err(TrolleyError::Transport {
            message: format!("{context} returned {}: {}", status.as_u16(), body.trim()),
            status: Some(status.as_u16()),
            source: None,
        });
    }
    let parsed = serde_json::from_str(&body)?;
    Ok(parsed)
}
