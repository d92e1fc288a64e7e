// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `trolley issuer` command implementation.
//!
//! Starts the standalone payment-token issuance service with an in-memory
//! token store. Tokens do not survive a restart.

use std::sync::Arc;

use tracing::info;

use trolley_config::TrolleyConfig;
use trolley_core::TrolleyError;
use trolley_issuer::{IssuerState, MemoryTokenStore, ServerConfig};

/// Runs the `trolley issuer` command.
pub async fn run_issuer(config: TrolleyConfig) -> Result<(), TrolleyError> {
    crate::init_tracing(&config.issuer.log_level);

    info!("starting trolley issuer");
    info!(
        default_currency = %config.issuer.default_currency,
        "issuer configured"
    );

    let state = IssuerState {
        store: Arc::new(MemoryTokenStore::default()),
        default_currency: config.issuer.default_currency.clone(),
    };

    let server_config = ServerConfig {
        host: config.issuer.host.clone(),
        port: config.issuer.port,
    };
    trolley_issuer::start_server(&server_config, state).await
}
