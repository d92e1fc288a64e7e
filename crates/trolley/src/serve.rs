// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `trolley serve` command implementation.
//!
//! Starts the chat bridge: seller client, payment orchestrator, and
//! conversational engine wired per configuration, serving the REST API
//! the shop frontend talks to.

use std::sync::Arc;

use tracing::{info, warn};

use trolley_acp::AcpClient;
use trolley_agent::ChatEngine;
use trolley_config::TrolleyConfig;
use trolley_core::{ChatModel, TrolleyError};
use trolley_gateway::{BridgeState, ServerConfig};
use trolley_openai::OpenAiClient;
use trolley_payments::{CheckoutOrchestrator, SellerBinding, SptExchange};

/// Runs the `trolley serve` command.
pub async fn run_serve(config: TrolleyConfig) -> Result<(), TrolleyError> {
    crate::init_tracing(&config.bridge.log_level);

    info!("starting trolley serve");

    let acp = Arc::new(AcpClient::new(
        &config.seller.base_url,
        &config.seller.api_key,
        &config.seller.api_version,
    )?);

    if config.payments.api_key.is_none() {
        warn!("payments.api_key is not set; token issuance will authenticate with an empty key");
    }
    let exchange = SptExchange::new(
        &config.payments.base_url,
        config.payments.api_key.as_deref().unwrap_or_default(),
    )?;
    let orchestrator = Arc::new(CheckoutOrchestrator::new(
        Arc::clone(&acp),
        exchange,
        config.payments.currency.clone(),
        SellerBinding {
            network_id: config.payments.network_id.clone(),
            external_id: config.payments.external_id.clone(),
        },
    ));

    // Without a model key the engine still serves every route; chat answers
    // with a fixed notice instead of calling out.
    let model: Option<Arc<dyn ChatModel>> = match &config.model.api_key {
        Some(api_key) => {
            let client = OpenAiClient::new(
                api_key,
                &config.model.endpoint,
                &config.model.model,
                config.model.temperature,
            )?;
            Some(Arc::new(client))
        }
        None => {
            warn!("model.api_key is not set; chat will answer with a fixed notice");
            None
        }
    };

    info!(
        seller = %config.seller.base_url,
        payments = %config.payments.base_url,
        model = %config.model.model,
        model_configured = config.model.api_key.is_some(),
        "bridge upstreams configured"
    );

    let engine = Arc::new(ChatEngine::new(
        model,
        Arc::clone(&acp),
        Arc::clone(&orchestrator),
    ));

    let server_config = ServerConfig {
        host: config.bridge.host.clone(),
        port: config.bridge.port,
    };
    let state = BridgeState {
        acp,
        orchestrator,
        engine,
    };
    trolley_gateway::start_server(&server_config, state).await
}
