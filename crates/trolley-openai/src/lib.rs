// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible completion provider for the Trolley agent.
//!
//! This crate implements [`ChatModel`] over the chat-completions wire
//! format. Conversation history already travels in that format, so the
//! adapter only fills in the model id and sampling temperature and unwraps
//! `choices[0].message`.

pub mod client;
pub mod types;

use async_trait::async_trait;
use trolley_core::{ChatMessage, ChatModel, ToolSchema, TrolleyError};

pub use crate::client::OpenAiClient;
pub use crate::types::{ChatCompletionRequest, ChatCompletionResponse, Choice};

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSchema],
    ) -> Result<ChatMessage, TrolleyError> {
        let request = ChatCompletionRequest {
            model: self.model().to_string(),
            messages: messages.to_vec(),
            tools: tools.to_vec(),
            temperature: self.temperature(),
        };
        let response = self.complete_chat(&request).await?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TrolleyError::Transport {
                message: "model response contained no choices".to_string(),
                status: None,
                source: None,
            })?;
        Ok(choice.message)
    }
}
