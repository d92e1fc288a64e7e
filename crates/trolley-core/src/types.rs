// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation and tool-call types in the chat-completions wire format.
//!
//! These types are shared across the model client, the tool-invocation loop,
//! and the bridge HTTP surface: inbound `/chat` bodies deserialize straight
//! into [`ChatMessage`] values, the loop appends to the same vector, and the
//! model client serializes it back out unchanged.

use serde::{Deserialize, Serialize};

/// A single message in a chat-completions conversation.
///
/// `role` is one of `user`, `assistant`, `system`, or `tool`. Tool-result
/// messages carry `tool_call_id` and `name` referring back to the assistant
/// tool call they resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message author role.
    pub role: String,

    /// Text content. Absent on assistant messages that only request tools.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Tool invocations requested by the assistant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,

    /// Identifier of the tool call this message resolves (role `tool` only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Action name of the tool call this message resolves (role `tool` only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }

    /// Creates a plain assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }

    /// Creates a tool-result message resolving the given call.
    ///
    /// `content` is the result payload, already JSON-encoded as a string.
    pub fn tool_result(
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
            name: Some(name.into()),
        }
    }

    /// Tool calls requested by this message, if it is an assistant message
    /// carrying at least one.
    pub fn requested_tools(&self) -> Option<&[ToolCall]> {
        match self.tool_calls.as_deref() {
            Some(calls) if !calls.is_empty() => Some(calls),
            _ => None,
        }
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Call identifier, echoed back on the matching tool-result message.
    pub id: String,

    /// Call type; always `function` on this wire.
    #[serde(rename = "type", default = "default_call_type")]
    pub call_type: String,

    /// The requested action and its arguments.
    pub function: FunctionCall,
}

fn default_call_type() -> String {
    "function".to_string()
}

/// The action half of a [`ToolCall`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Action name (e.g. `list_products`).
    pub name: String,

    /// Argument object, JSON-encoded as a string exactly as the model
    /// produced it. Parsed once at the loop boundary.
    pub arguments: String,
}

/// A tool definition advertised to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Schema type; always `function` on this wire.
    #[serde(rename = "type")]
    pub schema_type: String,

    /// The advertised function.
    pub function: FunctionSchema,
}

/// Name, description, and parameter schema of one advertised function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSchema {
    /// Action name the model will request.
    pub name: String,

    /// Human-readable description steering when the model should call it.
    pub description: String,

    /// JSON Schema describing the argument object.
    pub parameters: serde_json::Value,
}

impl ToolSchema {
    /// Creates a function tool schema.
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            schema_type: "function".to_string(),
            function: FunctionSchema {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}
