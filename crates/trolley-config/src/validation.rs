// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as well-formed upstream URLs and sane sampling
//! parameters.

use crate::diagnostic::ConfigError;
use crate::model::TrolleyConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TrolleyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    validate_bind_address("bridge.host", &config.bridge.host, &mut errors);
    validate_bind_address("issuer.host", &config.issuer.host, &mut errors);

    validate_base_url("seller.base_url", &config.seller.base_url, &mut errors);
    validate_base_url("payments.base_url", &config.payments.base_url, &mut errors);
    validate_base_url("model.endpoint", &config.model.endpoint, &mut errors);

    if config.seller.api_key.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "seller.api_key must not be empty".to_string(),
        });
    }

    if !(0.0..=2.0).contains(&config.model.temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "model.temperature must be between 0.0 and 2.0, got {}",
                config.model.temperature
            ),
        });
    }

    validate_currency("payments.currency", &config.payments.currency, &mut errors);
    validate_currency(
        "issuer.default_currency",
        &config.issuer.default_currency,
        &mut errors,
    );

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// A bind address must be a valid IP or a plausible hostname.
fn validate_bind_address(key: &str, addr: &str, errors: &mut Vec<ConfigError>) {
    let addr = addr.trim();
    if addr.is_empty() {
        errors.push(ConfigError::Validation {
            message: format!("{key} must not be empty"),
        });
        return;
    }
    let is_valid_ip = addr.parse::<std::net::IpAddr>().is_ok();
    let is_valid_hostname = addr
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
    if !is_valid_ip && !is_valid_hostname {
        errors.push(ConfigError::Validation {
            message: format!("{key} `{addr}` is not a valid IP address or hostname"),
        });
    }
}

/// Upstream URLs must be absolute http(s) URLs.
fn validate_base_url(key: &str, url: &str, errors: &mut Vec<ConfigError>) {
    let url = url.trim();
    if url.is_empty() {
        errors.push(ConfigError::Validation {
            message: format!("{key} must not be empty"),
        });
        return;
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        errors.push(ConfigError::Validation {
            message: format!("{key} `{url}` must start with http:// or https://"),
        });
    }
}

/// Currencies travel as lowercase ISO 4217 codes on the issuance wire.
fn validate_currency(key: &str, currency: &str, errors: &mut Vec<ConfigError>) {
    let ok = currency.len() == 3 && currency.chars().all(|c| c.is_ascii_lowercase());
    if !ok {
        errors.push(ConfigError::Validation {
            message: format!(
                "{key} `{currency}` must be a three-letter lowercase currency code"
            ),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = TrolleyConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_seller_base_url_fails_validation() {
        let mut config = TrolleyConfig::default();
        config.seller.base_url = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("seller.base_url"))
        ));
    }

    #[test]
    fn non_http_endpoint_fails_validation() {
        let mut config = TrolleyConfig::default();
        config.model.endpoint = "ftp://model.example.com".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("model.endpoint"))
        ));
    }

    #[test]
    fn out_of_range_temperature_fails_validation() {
        let mut config = TrolleyConfig::default();
        config.model.temperature = 3.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("temperature"))
        ));
    }

    #[test]
    fn uppercase_currency_fails_validation() {
        let mut config = TrolleyConfig::default();
        config.payments.currency = "USD".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("payments.currency"))
        ));
    }

    #[test]
    fn multiple_errors_are_collected() {
        let mut config = TrolleyConfig::default();
        config.bridge.host = "".to_string();
        config.seller.api_key = " ".to_string();
        config.issuer.default_currency = "dollars".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = TrolleyConfig::default();
        config.bridge.host = "127.0.0.1".to_string();
        config.seller.base_url = "https://seller.example.com".to_string();
        config.model.temperature = 0.0;
        config.payments.currency = "eur".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
