// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./trolley.toml` > `~/.config/trolley/trolley.toml`
//! > `/etc/trolley/trolley.toml` with environment variable overrides via the
//! `TROLLEY_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TrolleyConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/trolley/trolley.toml` (system-wide)
/// 3. `~/.config/trolley/trolley.toml` (user XDG config)
/// 4. `./trolley.toml` (local directory)
/// 5. `TROLLEY_*` environment variables
pub fn load_config() -> Result<TrolleyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TrolleyConfig::default()))
        .merge(Toml::file("/etc/trolley/trolley.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("trolley/trolley.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("trolley.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<TrolleyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TrolleyConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TrolleyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TrolleyConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so underscore-containing
/// key names stay intact: `TROLLEY_SELLER_BASE_URL` must map to
/// `seller.base_url`, not `seller.base.url`.
fn env_provider() -> Env {
    Env::prefixed("TROLLEY_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped, e.g.
        // TROLLEY_SELLER_BASE_URL -> "seller_base_url".
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("bridge_", "bridge.", 1)
            .replacen("seller_", "seller.", 1)
            .replacen("model_", "model.", 1)
            .replacen("payments_", "payments.", 1)
            .replacen("issuer_", "issuer.", 1);
        mapped.into()
    })
}
