// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bridge HTTP server built on axum.
//!
//! Sets up routes and shared state for the chat-bridge REST API.

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;

use trolley_acp::AcpClient;
use trolley_agent::ChatEngine;
use trolley_core::TrolleyError;
use trolley_payments::CheckoutOrchestrator;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct BridgeState {
    /// Seller checkout API client.
    pub acp: Arc<AcpClient>,
    /// Completion flow: token exchange bound to the session total.
    pub orchestrator: Arc<CheckoutOrchestrator>,
    /// Conversational loop driving tool execution.
    pub engine: Arc<ChatEngine>,
}

/// Bridge server configuration (mirrors BridgeConfig from trolley-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Builds the bridge router:
/// - GET /products
/// - POST /checkout/create
/// - GET /checkout/{checkout_id}
/// - PUT /checkout/{checkout_id}/update
/// - POST /checkout/{checkout_id}/complete
/// - POST /checkout/{checkout_id}/cancel
/// - POST /chat
/// - POST /exchange_token
pub fn router(state: BridgeState) -> Router {
    Router::new()
        .route("/products", get(handlers::list_products))
        .route("/checkout/create", post(handlers::create_checkout))
        .route("/checkout/{checkout_id}", get(handlers::get_checkout))
        .route(
            "/checkout/{checkout_id}/update",
            put(handlers::update_checkout),
        )
        .route(
            "/checkout/{checkout_id}/complete",
            post(handlers::complete_checkout),
        )
        .route(
            "/checkout/{checkout_id}/cancel",
            post(handlers::cancel_checkout),
        )
        .route("/chat", post(handlers::chat))
        .route("/exchange_token", post(handlers::exchange_token))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Start the chat-bridge HTTP server on the configured host:port.
pub async fn start_server(config: &ServerConfig, state: BridgeState) -> Result<(), TrolleyError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TrolleyError::Transport {
            message: format!("failed to bind bridge to {addr}: {e}"),
            status: None,
            source: Some(Box::new(e)),
        })?;

    tracing::info!("Bridge server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| TrolleyError::Transport {
            message: format!("bridge server error: {e}"),
            status: None,
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
