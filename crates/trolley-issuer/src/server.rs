// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Issuer HTTP server built on axum.
//!
//! Sets up routes and shared state for the token issuance API.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use trolley_core::TrolleyError;

use crate::handlers::{self, IssuerState};

/// Issuer server configuration (mirrors IssuerConfig from trolley-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Builds the issuance router:
/// - POST /v1/shared_payment/issued_tokens
/// - GET /v1/shared_payment/granted_tokens/{spt_id}
/// - GET /health
pub fn router(state: IssuerState) -> Router {
    Router::new()
        .route(
            "/v1/shared_payment/issued_tokens",
            post(handlers::issue_token),
        )
        .route(
            "/v1/shared_payment/granted_tokens/{spt_id}",
            get(handlers::resolve_token),
        )
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Start the token issuance HTTP server on the configured host:port.
pub async fn start_server(config: &ServerConfig, state: IssuerState) -> Result<(), TrolleyError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TrolleyError::Transport {
            message: format!("failed to bind issuer to {addr}: {e}"),
            status: None,
            source: Some(Box::new(e)),
        })?;

    tracing::info!("Issuer server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| TrolleyError::Transport {
            message: format!("issuer server error: {e}"),
            status: None,
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
