// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seam traits between the tool-invocation loop and its collaborators.

use async_trait::async_trait;

use crate::error::TrolleyError;
use crate::types::{ChatMessage, ToolSchema};

/// A conversational model that completes a message history.
///
/// The loop owns the history and the advertised tool set; implementations
/// own transport, authentication, and sampling parameters. One call maps to
/// exactly one model invocation.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Completes the conversation, returning the next assistant message
    /// (which may request tool calls).
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSchema],
    ) -> Result<ChatMessage, TrolleyError>;
}
