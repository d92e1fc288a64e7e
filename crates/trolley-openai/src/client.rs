// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for an OpenAI-compatible chat-completions API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;
use trolley_core::TrolleyError;

use crate::types::{ChatCompletionRequest, ChatCompletionResponse};

// Completions can be slow; seller-side calls use a much tighter budget.
const REQUEST_TIMEOUT_SECS: u64 = 300;

/// Chat-completions client bound to one endpoint and model.
///
/// The endpoint is the full completions URL, not a base to join paths onto.
/// Requests are never retried; callers degrade on failure instead.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f64,
}

impl OpenAiClient {
    pub fn new(
        api_key: &str,
        endpoint: &str,
        model: &str,
        temperature: f64,
    ) -> Result<Self, TrolleyError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| TrolleyError::Config("model.api_key contains invalid header characters".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TrolleyError::Transport {
                message: "failed to build model HTTP client".to_string(),
                status: None,
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Posts one completion request and parses the response.
    pub async fn complete_chat(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, TrolleyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| TrolleyError::Transport {
                message: "model request failed".to_string(),
                status: None,
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "completion response received");

        let body = response.text().await.map_err(|e| TrolleyError::Transport {
            message: "failed to read model response".to_string(),
            status: Some(status.as_u16()),
            source: Some(Box::new(e)),
        })?;
        if !status.is_success() {
            return Err(TrolleyError::Transport {
                message: format!("model API returned {}: {}", status.as_u16(), body.trim()),
                status: Some(status.as_u16()),
                source: None,
            });
        }
        let parsed = serde_json::from_str(&body)?;
        Ok(parsed)
    }
}
