// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Trolley commerce bridge.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Trolley configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to the values
/// a local demo deployment expects.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TrolleyConfig {
    /// Chat-bridge HTTP listener settings.
    #[serde(default)]
    pub bridge: BridgeConfig,

    /// Seller checkout backend settings.
    #[serde(default)]
    pub seller: SellerConfig,

    /// Conversational model API settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Payment-token issuance API settings (consumed side).
    #[serde(default)]
    pub payments: PaymentsConfig,

    /// Token issuance service settings (exposed side, separate process).
    #[serde(default)]
    pub issuer: IssuerConfig,
}

/// Chat-bridge HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    /// Bind address for the bridge listener.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port for the bridge listener.
    #[serde(default = "default_bridge_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_bridge_port(),
            log_level: default_log_level(),
        }
    }
}

/// Seller checkout backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SellerConfig {
    /// Base URL of the seller backend.
    #[serde(default = "default_seller_base_url")]
    pub base_url: String,

    /// Bearer credential sent on every seller call.
    #[serde(default = "default_seller_api_key")]
    pub api_key: String,

    /// Protocol version string sent in the `API-Version` header.
    #[serde(default = "default_seller_api_version")]
    pub api_version: String,
}

impl Default for SellerConfig {
    fn default() -> Self {
        Self {
            base_url: default_seller_base_url(),
            api_key: default_seller_api_key(),
            api_version: default_seller_api_version(),
        }
    }
}

/// Conversational model API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Model API key. `None` degrades chat to a fixed notice instead of
    /// calling the model.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat-completions endpoint URL.
    #[serde(default = "default_model_endpoint")]
    pub endpoint: String,

    /// Model identifier sent on every completion request.
    #[serde(default = "default_model_id")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_model_endpoint(),
            model: default_model_id(),
            temperature: default_temperature(),
        }
    }
}

/// Payment-token issuance API configuration (the exchange's upstream).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PaymentsConfig {
    /// Payment-processor API key used as HTTP basic-auth username.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the token issuance API.
    #[serde(default = "default_payments_base_url")]
    pub base_url: String,

    /// Currency bound into issued tokens.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Seller network identifier bound into issued tokens.
    #[serde(default = "default_network_id")]
    pub network_id: String,

    /// Seller external identifier bound into issued tokens.
    #[serde(default = "default_external_id")]
    pub external_id: String,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_payments_base_url(),
            currency: default_currency(),
            network_id: default_network_id(),
            external_id: default_external_id(),
        }
    }
}

/// Token issuance service configuration (separate process).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IssuerConfig {
    /// Bind address for the issuer listener.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port for the issuer listener.
    #[serde(default = "default_issuer_port")]
    pub port: u16,

    /// Currency applied when an issuance request names none.
    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_issuer_port(),
            default_currency: default_currency(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_bridge_port() -> u16 {
    9000
}

fn default_issuer_port() -> u16 {
    8001
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_seller_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_seller_api_key() -> String {
    "facilitator_token".to_string()
}

fn default_seller_api_version() -> String {
    "2025-09-29".to_string()
}

fn default_model_endpoint() -> String {
    "https://api.dat1.co/api/v1/collection/open-ai/chat/completions".to_string()
}

fn default_model_id() -> String {
    "gpt-120-oss".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_payments_base_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_currency() -> String {
    "usd".to_string()
}

fn default_network_id() -> String {
    "internal".to_string()
}

fn default_external_id() -> String {
    "stripe_test_merchant".to_string()
}
