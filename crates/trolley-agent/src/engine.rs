// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The tool-invocation loop.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};
use trolley_acp::AcpClient;
use trolley_core::{ChatMessage, ChatModel, ToolCall, ToolSchema, TrolleyError};
use trolley_payments::CheckoutOrchestrator;

use crate::tools::{commerce_tools, ToolAction};

/// Upper bound on model invocations per external call. The second
/// invocation closes a tool round; a response requesting further tools at
/// that point is returned as-is rather than starting another round.
pub const MAX_MODEL_ROUNDS: usize = 2;

const MISSING_KEY_REPLY: &str = "Error: model API key is not configured in the backend.";
const MODEL_FAILURE_REPLY: &str =
    "I apologize, but I'm having trouble connecting to my brain right now.";

/// Final assistant reply for one `/chat` request.
///
/// `original_tool_calls` carries the first round's calls verbatim when a
/// tool round ran, so the caller can apply frontend-only actions
/// (`add_to_cart`, `start_checkout`) itself.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_tool_calls: Option<Vec<ToolCall>>,
}

impl ChatReply {
    fn new(message: ChatMessage, original_tool_calls: Option<Vec<ToolCall>>) -> Self {
        Self {
            role: message.role,
            content: message.content,
            tool_calls: message.tool_calls,
            original_tool_calls,
        }
    }
}

/// Drives one conversation turn: model call, tool execution, follow-up call.
pub struct ChatEngine {
    model: Option<Arc<dyn ChatModel>>,
    acp: Arc<AcpClient>,
    orchestrator: Arc<CheckoutOrchestrator>,
    tools: Vec<ToolSchema>,
}

impl ChatEngine {
    /// `model` is `None` when no model API key is configured; the engine
    /// then answers every turn with a fixed notice instead of failing.
    pub fn new(
        model: Option<Arc<dyn ChatModel>>,
        acp: Arc<AcpClient>,
        orchestrator: Arc<CheckoutOrchestrator>,
    ) -> Self {
        Self {
            model,
            acp,
            orchestrator,
            tools: commerce_tools(),
        }
    }

    /// Processes one inbound message history to a final assistant reply.
    ///
    /// The caller owns the history; tool-round bookkeeping (the assistant
    /// tool-call message and one result message per call, in request order)
    /// is appended locally before the follow-up invocation.
    pub async fn process(&self, mut messages: Vec<ChatMessage>) -> ChatReply {
        let mut response = self.call_model(&messages).await;
        let mut original_calls: Option<Vec<ToolCall>> = None;

        for _ in 1..MAX_MODEL_ROUNDS {
            let Some(calls) = response.requested_tools() else {
                break;
            };
            let calls = calls.to_vec();
            debug!(count = calls.len(), "executing tool round");
            messages.push(response.clone());
            for call in &calls {
                let content = self.run_tool(call).await;
                messages.push(ChatMessage::tool_result(
                    call.id.clone(),
                    call.function.name.clone(),
                    content,
                ));
            }
            response = self.call_model(&messages).await;
            original_calls = Some(calls);
        }

        ChatReply::new(response, original_calls)
    }

    /// Invokes the model, degrading to a fixed assistant message when no
    /// model is configured or the call fails. Chat never surfaces a model
    /// outage as an HTTP error.
    async fn call_model(&self, messages: &[ChatMessage]) -> ChatMessage {
        let Some(model) = &self.model else {
            return ChatMessage::assistant(MISSING_KEY_REPLY);
        };
        match model.complete(messages, &self.tools).await {
            Ok(message) => message,
            Err(err) => {
                warn!(error = %err, "model completion failed");
                ChatMessage::assistant(MODEL_FAILURE_REPLY)
            }
        }
    }

    /// Resolves one tool call to its result payload.
    ///
    /// Every call gets a payload: backend actions return their real result
    /// or an error object, frontend-only actions a synthetic acknowledgment,
    /// anything unparseable an error object. The round never aborts here.
    async fn run_tool(&self, call: &ToolCall) -> String {
        match ToolAction::parse(call) {
            Ok(ToolAction::ListProducts) => match self.acp.list_products().await {
                Ok(catalog) => json_payload(&catalog),
                Err(err) => error_payload(&err),
            },
            Ok(ToolAction::AddToCart(args)) => json!({
                "status": "success",
                "message": format!("Added {} to cart", args.item_id)
            })
            .to_string(),
            Ok(ToolAction::StartCheckout) => json!({
                "status": "success",
                "message": "Checkout started"
            })
            .to_string(),
            Ok(ToolAction::CompleteCheckout(args)) => match self
                .orchestrator
                .complete_with_payment(&args.checkout_id, &args.payment_token, None, None)
                .await
            {
                Ok(session) => json_payload(&session),
                Err(err) => error_payload(&err),
            },
            Err(TrolleyError::UnknownAction { name }) => {
                warn!(name, "model requested a tool outside the action set");
                json!({"error": "Unknown tool"}).to_string()
            }
            Err(err) => json!({
                "error": format!("Invalid arguments for {}: {err}", call.function.name)
            })
            .to_string(),
        }
    }
}

fn json_payload<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| r#"{"error":"failed to encode tool result"}"#.to_string())
}

fn error_payload(err: &TrolleyError) -> String {
    json!({"error": err.to_string()}).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;
    use trolley_acp::API_VERSION;
    use trolley_core::FunctionCall;
    use trolley_payments::{SellerBinding, SptExchange};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Replays a fixed sequence of model responses and records every
    /// history it was invoked with.
    struct ScriptedModel {
        responses: Mutex<VecDeque<Result<ChatMessage, TrolleyError>>>,
        invocations: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedModel {
        fn new(responses: Vec<Result<ChatMessage, TrolleyError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                invocations: Mutex::new(Vec::new()),
            })
        }

        fn invocation_count(&self) -> usize {
            self.invocations.lock().unwrap().len()
        }

        fn invocation(&self, index: usize) -> Vec<ChatMessage> {
            self.invocations.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            _tools: &[ToolSchema],
        ) -> Result<ChatMessage, TrolleyError> {
            self.invocations.lock().unwrap().push(messages.to_vec());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("model invoked more often than scripted")
        }
    }

    fn assistant_with_calls(calls: Vec<ToolCall>) -> ChatMessage {
        ChatMessage {
            role: "assistant".to_string(),
            content: None,
            tool_calls: Some(calls),
            tool_call_id: None,
            name: None,
        }
    }

    fn tool_call(id: &str, name: &str, arguments: &str) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            call_type: "function".to_string(),
            function: FunctionCall {
                name: name.to_string(),
                arguments: arguments.to_string(),
            },
        }
    }

    fn engine(
        model: Option<Arc<ScriptedModel>>,
        seller: &MockServer,
        issuer: &MockServer,
    ) -> ChatEngine {
        let model = model.map(|m| m as Arc<dyn ChatModel>);
        let acp = Arc::new(
            AcpClient::new(&seller.uri(), "facilitator_token", API_VERSION).unwrap(),
        );
        let exchange = SptExchange::new(&issuer.uri(), "sk_test_123").unwrap();
        let orchestrator = Arc::new(CheckoutOrchestrator::new(
            Arc::clone(&acp),
            exchange,
            "usd".to_string(),
            SellerBinding {
                network_id: "internal".to_string(),
                external_id: "stripe_test_merchant".to_string(),
            },
        ));
        ChatEngine::new(model, acp, orchestrator)
    }

    #[tokio::test]
    async fn zero_tool_response_passes_through_after_one_invocation() {
        let seller = MockServer::start().await;
        let issuer = MockServer::start().await;
        let model = ScriptedModel::new(vec![Ok(ChatMessage::assistant("Hello!"))]);

        let engine = engine(Some(model.clone()), &seller, &issuer);
        let reply = engine.process(vec![ChatMessage::user("hi")]).await;

        assert_eq!(model.invocation_count(), 1);
        assert_eq!(reply.content.as_deref(), Some("Hello!"));
        assert!(reply.tool_calls.is_none());
        assert!(reply.original_tool_calls.is_none());
    }

    #[tokio::test]
    async fn tool_round_appends_results_in_request_order() {
        let seller = MockServer::start().await;
        let issuer = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "products": [{"id": "item_1", "name": "Glass of wine", "price": 500}]
            })))
            .expect(1)
            .mount(&seller)
            .await;

        let calls = vec![
            tool_call("call_1", "list_products", "{}"),
            tool_call("call_2", "add_to_cart", r#"{"item_id":"item_9"}"#),
        ];
        let model = ScriptedModel::new(vec![
            Ok(assistant_with_calls(calls.clone())),
            Ok(ChatMessage::assistant("Here you go")),
        ]);

        let engine = engine(Some(model.clone()), &seller, &issuer);
        let reply = engine
            .process(vec![ChatMessage::user("what do you sell?")])
            .await;

        assert_eq!(model.invocation_count(), 2);

        let second = model.invocation(1);
        assert_eq!(second.len(), 4);
        assert_eq!(second[1].role, "assistant");
        assert_eq!(second[1].tool_calls.as_ref().unwrap().len(), 2);
        assert_eq!(second[2].role, "tool");
        assert_eq!(second[2].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(second[2].name.as_deref(), Some("list_products"));
        assert!(second[2].content.as_ref().unwrap().contains("Glass of wine"));
        assert_eq!(second[3].tool_call_id.as_deref(), Some("call_2"));
        assert_eq!(
            second[3].content.as_deref(),
            Some(r#"{"message":"Added item_9 to cart","status":"success"}"#)
        );

        assert_eq!(reply.content.as_deref(), Some("Here you go"));
        assert_eq!(reply.original_tool_calls.as_ref().unwrap(), &calls);
    }

    #[tokio::test]
    async fn second_response_with_tools_still_stops_at_two_invocations() {
        let seller = MockServer::start().await;
        let issuer = MockServer::start().await;

        let first = vec![tool_call("call_1", "start_checkout", "{}")];
        let second = vec![tool_call("call_9", "start_checkout", "{}")];
        let model = ScriptedModel::new(vec![
            Ok(assistant_with_calls(first.clone())),
            Ok(assistant_with_calls(second.clone())),
        ]);

        let engine = engine(Some(model.clone()), &seller, &issuer);
        let reply = engine.process(vec![ChatMessage::user("checkout")]).await;

        assert_eq!(model.invocation_count(), 2);
        assert_eq!(reply.tool_calls.as_ref().unwrap(), &second);
        assert_eq!(reply.original_tool_calls.as_ref().unwrap(), &first);
    }

    #[tokio::test]
    async fn missing_model_key_degrades_to_fixed_notice() {
        let seller = MockServer::start().await;
        let issuer = MockServer::start().await;

        let engine = engine(None, &seller, &issuer);
        let reply = engine.process(vec![ChatMessage::user("hi")]).await;

        assert_eq!(reply.role, "assistant");
        assert_eq!(reply.content.as_deref(), Some(MISSING_KEY_REPLY));
    }

    #[tokio::test]
    async fn model_failure_degrades_to_apology() {
        let seller = MockServer::start().await;
        let issuer = MockServer::start().await;
        let model = ScriptedModel::new(vec![Err(TrolleyError::Transport {
            message: "model API returned 500".to_string(),
            status: Some(500),
            source: None,
        })]);

        let engine = engine(Some(model), &seller, &issuer);
        let reply = engine.process(vec![ChatMessage::user("hi")]).await;

        assert_eq!(reply.content.as_deref(), Some(MODEL_FAILURE_REPLY));
        assert!(reply.original_tool_calls.is_none());
    }

    #[tokio::test]
    async fn unknown_tool_resolves_to_error_payload_and_round_continues() {
        let seller = MockServer::start().await;
        let issuer = MockServer::start().await;

        let model = ScriptedModel::new(vec![
            Ok(assistant_with_calls(vec![
                tool_call("call_1", "make_coffee", "{}"),
                tool_call("call_2", "start_checkout", "{}"),
            ])),
            Ok(ChatMessage::assistant("done")),
        ]);

        let engine = engine(Some(model.clone()), &seller, &issuer);
        engine.process(vec![ChatMessage::user("go")]).await;

        let second = model.invocation(1);
        assert_eq!(
            second[2].content.as_deref(),
            Some(r#"{"error":"Unknown tool"}"#)
        );
        assert_eq!(
            second[3].content.as_deref(),
            Some(r#"{"message":"Checkout started","status":"success"}"#)
        );
    }

    #[tokio::test]
    async fn malformed_arguments_resolve_to_error_payload() {
        let seller = MockServer::start().await;
        let issuer = MockServer::start().await;

        let model = ScriptedModel::new(vec![
            Ok(assistant_with_calls(vec![tool_call(
                "call_1",
                "complete_checkout",
                r#"{"checkout_id":"checkout_abc"}"#,
            )])),
            Ok(ChatMessage::assistant("sorry")),
        ]);

        let engine = engine(Some(model.clone()), &seller, &issuer);
        engine.process(vec![ChatMessage::user("pay")]).await;

        let second = model.invocation(1);
        let content = second[2].content.as_deref().unwrap();
        assert!(content.starts_with(r#"{"error":"Invalid arguments for complete_checkout"#));
    }

    #[tokio::test]
    async fn complete_checkout_action_runs_the_full_payment_flow() {
        let seller = MockServer::start().await;
        let issuer = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/checkout_sessions/checkout_abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "checkout_abc",
                "status": "ready_for_payment",
                "line_items": [],
                "totals": [{"type": "total", "display_text": "Total", "amount": 1300}]
            })))
            .mount(&seller)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/shared_payment/issued_tokens"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "spt_0a1b2c3d4e5f60718293a4b5",
                "object": "shared_payment.issued_token",
                "created": 1761406798,
                "livemode": false
            })))
            .expect(1)
            .mount(&issuer)
            .await;
        Mock::given(method("POST"))
            .and(path("/checkout_sessions/checkout_abc/complete"))
            .and(body_json(json!({
                "payment_data": {
                    "token": "spt_0a1b2c3d4e5f60718293a4b5",
                    "provider": "stripe"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "checkout_abc",
                "status": "completed",
                "line_items": [],
                "totals": [{"type": "total", "display_text": "Total", "amount": 1300}],
                "order": {
                    "id": "order_123",
                    "checkout_session_id": "checkout_abc",
                    "permalink_url": "https://example.com/orders/order_123"
                }
            })))
            .expect(1)
            .mount(&seller)
            .await;

        let model = ScriptedModel::new(vec![
            Ok(assistant_with_calls(vec![tool_call(
                "call_1",
                "complete_checkout",
                r#"{"checkout_id":"checkout_abc","payment_token":"tok_visa"}"#,
            )])),
            Ok(ChatMessage::assistant("Order placed!")),
        ]);

        let engine = engine(Some(model.clone()), &seller, &issuer);
        let reply = engine.process(vec![ChatMessage::user("pay now")]).await;

        let second = model.invocation(1);
        let content = second[2].content.as_deref().unwrap();
        assert!(content.contains(r#""status":"completed""#));
        assert!(content.contains("order_123"));
        assert_eq!(reply.content.as_deref(), Some("Order placed!"));
    }
}
