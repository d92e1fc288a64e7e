// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete Trolley pipeline.
//!
//! Each test spins up a real issuer server and a real bridge server on
//! ephemeral ports, with the seller backend mocked. Tests are independent
//! and order-insensitive.

use std::sync::Arc;

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use trolley_acp::AcpClient;
use trolley_agent::ChatEngine;
use trolley_gateway::BridgeState;
use trolley_issuer::{IssuerState, MemoryTokenStore};
use trolley_payments::{CheckoutOrchestrator, SellerBinding, SptExchange};

async fn spawn_issuer() -> String {
    let state = IssuerState {
        store: Arc::new(MemoryTokenStore::default()),
        default_currency: "usd".to_string(),
    };
    let app = trolley_issuer::router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn bridge_state(seller_url: &str, issuer_url: &str) -> BridgeState {
    let acp = Arc::new(AcpClient::new(seller_url, "facilitator_token", "2025-09-29").unwrap());
    let exchange = SptExchange::new(issuer_url, "sk_test_123").unwrap();
    let orchestrator = Arc::new(CheckoutOrchestrator::new(
        Arc::clone(&acp),
        exchange,
        "usd".to_string(),
        SellerBinding {
            network_id: "internal".to_string(),
            external_id: "stripe_test_merchant".to_string(),
        },
    ));
    let engine = Arc::new(ChatEngine::new(
        None,
        Arc::clone(&acp),
        Arc::clone(&orchestrator),
    ));
    BridgeState {
        acp,
        orchestrator,
        engine,
    }
}

async fn spawn_bridge(seller_url: &str, issuer_url: &str) -> String {
    let app = trolley_gateway::router(bridge_state(seller_url, issuer_url));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn session_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "status": status,
        "currency": "usd",
        "line_items": [],
        "totals": [
            {"type": "subtotal", "display_text": "Subtotal", "amount": 1100},
            {"type": "tax", "display_text": "Tax", "amount": 200},
            {"type": "total", "display_text": "Total", "amount": 1300}
        ]
    })
}

// ---- Token exchange through a real issuer ----

#[tokio::test]
async fn exchange_token_round_trips_through_real_issuer() {
    let seller = MockServer::start().await;
    let issuer_url = spawn_issuer().await;
    let bridge_url = spawn_bridge(&seller.uri(), &issuer_url).await;
    let client = reqwest::Client::new();

    let before = chrono::Utc::now().timestamp();
    let response = client
        .post(format!("{bridge_url}/exchange_token"))
        .json(&json!({"payment_token": "tok_visa", "amount": 1300}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    let spt_token = body["spt_token"].as_str().unwrap().to_string();
    assert!(spt_token.starts_with("spt_"));

    // The issuer stored the full binding: credential, cap, currency, expiry.
    let granted: Value = client
        .get(format!(
            "{issuer_url}/v1/shared_payment/granted_tokens/{spt_token}"
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(granted["object"], "shared_payment.granted_token");
    assert_eq!(granted["payment_method"], "tok_visa");
    assert_eq!(granted["usage_limits"]["max_amount"], 1300);
    assert_eq!(granted["usage_limits"]["currency"], "usd");
    assert_eq!(granted["seller_details"]["network_id"], "internal");
    let expires_at = granted["usage_limits"]["expires_at"].as_i64().unwrap();
    assert!(expires_at >= before + 86_400);
    assert!(expires_at <= chrono::Utc::now().timestamp() + 86_400 + 5);

    let health: Value = client
        .get(format!("{issuer_url}/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["active_tokens"], 1);
}

// ---- Completion: the seller only ever sees a scoped token ----

#[tokio::test]
async fn completion_sends_scoped_token_not_raw_credential() {
    let seller = MockServer::start().await;
    let issuer_url = spawn_issuer().await;
    let bridge_url = spawn_bridge(&seller.uri(), &issuer_url).await;
    let client = reqwest::Client::new();

    Mock::given(method("GET"))
        .and(path("/checkout_sessions/checkout_1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(session_json("checkout_1", "ready_for_payment")),
        )
        .expect(1)
        .mount(&seller)
        .await;
    Mock::given(method("POST"))
        .and(path("/checkout_sessions/checkout_1/complete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "checkout_1",
            "status": "completed",
            "currency": "usd",
            "line_items": [],
            "totals": [{"type": "total", "amount": 1300}],
            "order": {
                "id": "order_1",
                "checkout_session_id": "checkout_1",
                "permalink_url": "https://seller.example/orders/order_1"
            }
        })))
        .expect(1)
        .mount(&seller)
        .await;

    let response = client
        .post(format!("{bridge_url}/checkout/checkout_1/complete"))
        .json(&json!({"payment_token": "tok_visa"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "completed");
    assert_eq!(body["order"]["id"], "order_1");

    // Inspect what the seller actually received on the completion call.
    let requests = seller.received_requests().await.unwrap();
    let complete = requests
        .iter()
        .find(|r| r.url.path().ends_with("/complete"))
        .unwrap();
    let complete_body: Value = serde_json::from_slice(&complete.body).unwrap();
    let token = complete_body["payment_data"]["token"].as_str().unwrap();
    assert!(token.starts_with("spt_"));
    assert_ne!(token, "tok_visa");

    // The token the seller saw resolves at the issuer, capped at the
    // session total rather than anything the caller supplied.
    let granted: Value = client
        .get(format!(
            "{issuer_url}/v1/shared_payment/granted_tokens/{token}"
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(granted["payment_method"], "tok_visa");
    assert_eq!(granted["usage_limits"]["max_amount"], 1300);
}

// ---- Checkout passthrough routing ----

#[tokio::test]
async fn checkout_create_then_fetch_over_http() {
    let seller = MockServer::start().await;
    let issuer_url = spawn_issuer().await;
    let bridge_url = spawn_bridge(&seller.uri(), &issuer_url).await;
    let client = reqwest::Client::new();

    Mock::given(method("POST"))
        .and(path("/checkout_sessions"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(session_json("checkout_1", "ready_for_payment")),
        )
        .expect(1)
        .mount(&seller)
        .await;
    Mock::given(method("GET"))
        .and(path("/checkout_sessions/checkout_1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(session_json("checkout_1", "ready_for_payment")),
        )
        .expect(1)
        .mount(&seller)
        .await;

    let created = client
        .post(format!("{bridge_url}/checkout/create"))
        .json(&json!({"items": [{"id": "item_1", "quantity": 2}]}))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), 201);
    let created: Value = created.json().await.unwrap();
    assert_eq!(created["id"], "checkout_1");

    let fetched = client
        .get(format!("{bridge_url}/checkout/checkout_1"))
        .send()
        .await
        .unwrap();
    assert_eq!(fetched.status(), 200);
    let fetched: Value = fetched.json().await.unwrap();
    assert_eq!(fetched["status"], "ready_for_payment");
}

// ---- Chat degradation over the wire ----

#[tokio::test]
async fn chat_degrades_over_http_without_model_key() {
    let seller = MockServer::start().await;
    let issuer_url = spawn_issuer().await;
    let bridge_url = spawn_bridge(&seller.uri(), &issuer_url).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{bridge_url}/chat"))
        .json(&json!({"messages": [{"role": "user", "content": "hi"}]}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["role"], "assistant");
    assert_eq!(
        body["content"],
        "Error: model API key is not configured in the backend."
    );
}

// ---- Issuer wire format over real HTTP form encoding ----

#[tokio::test]
async fn issuer_decodes_bracketed_form_fields_over_http() {
    let issuer_url = spawn_issuer().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{issuer_url}/v1/shared_payment/issued_tokens"))
        .form(&[
            ("payment_method", "pm_card"),
            ("usage_limits[currency]", "eur"),
            ("usage_limits[max_amount]", "250"),
            ("seller_details[network_id]", "internal"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let issued: Value = response.json().await.unwrap();
    let id = issued["id"].as_str().unwrap();
    assert_eq!(issued["object"], "shared_payment.issued_token");

    let granted: Value = client
        .get(format!("{issuer_url}/v1/shared_payment/granted_tokens/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(granted["usage_limits"]["currency"], "eur");
    assert_eq!(granted["usage_limits"]["max_amount"], 250);
    assert!(granted["usage_limits"]["expires_at"].is_null());
    assert_eq!(granted["seller_details"]["network_id"], "internal");
    assert!(granted["seller_details"]["external_id"].is_null());
}

#[tokio::test]
async fn issuer_rejects_missing_payment_method_in_wire_format() {
    let issuer_url = spawn_issuer().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{issuer_url}/v1/shared_payment/issued_tokens"))
        .form(&[("usage_limits[currency]", "usd")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["type"], "invalid_request");
    assert_eq!(body["error"]["code"], "missing_payment_method");
    assert_eq!(body["error"]["message"], "payment_method is required");
}
