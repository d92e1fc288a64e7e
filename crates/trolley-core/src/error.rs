// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Trolley commerce bridge.

use thiserror::Error;

/// The primary error type used across all Trolley crates.
#[derive(Debug, Error)]
pub enum TrolleyError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Network failure or non-2xx response from an external dependency
    /// (seller backend, payment-token issuer, or model API).
    ///
    /// `status` carries the upstream HTTP status when a response was
    /// received; it is `None` for connect/timeout failures.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        status: Option<u16>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A required field was missing or malformed in an inbound request.
    /// Rejected at the boundary before any external call is made.
    #[error("{message}")]
    Validation { message: String },

    /// The checkout session carries no totals entry of type `total`.
    /// Completion must not guess an amount from any other totals kind.
    #[error("Total amount not found in checkout response")]
    TotalNotFound,

    /// The model requested a tool outside the fixed action set.
    #[error("unknown action: {name}")]
    UnknownAction { name: String },

    /// JSON (de)serialization failure while assembling or reading a payload.
    #[error("serialization error: {source}")]
    Serialization {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl TrolleyError {
    /// Upstream HTTP status attached to a transport failure, if any
    /// response was received before the operation failed.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TrolleyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            source: Box::new(err),
        }
    }
}
