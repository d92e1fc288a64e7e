// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Trolley commerce bridge.
//!
//! This crate provides the error taxonomy, the chat-completions conversation
//! types, and the model seam trait used throughout the Trolley workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TrolleyError;
pub use traits::ChatModel;
pub use types::{ChatMessage, FunctionCall, FunctionSchema, ToolCall, ToolSchema};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trolley_error_has_all_variants() {
        // Verify all 6 error variants exist and can be constructed.
        let _config = TrolleyError::Config("test".into());
        let _transport = TrolleyError::Transport {
            message: "test".into(),
            status: Some(502),
            source: None,
        };
        let _validation = TrolleyError::Validation {
            message: "Items are required".into(),
        };
        let _total = TrolleyError::TotalNotFound;
        let _unknown = TrolleyError::UnknownAction {
            name: "refund_everything".into(),
        };
        let _serialization = TrolleyError::Serialization {
            source: Box::new(std::io::Error::other("test")),
        };
    }

    #[test]
    fn upstream_status_only_set_for_transport() {
        let transport = TrolleyError::Transport {
            message: "seller returned 404".into(),
            status: Some(404),
            source: None,
        };
        assert_eq!(transport.upstream_status(), Some(404));

        let connect = TrolleyError::Transport {
            message: "connection refused".into(),
            status: None,
            source: None,
        };
        assert_eq!(connect.upstream_status(), None);

        let validation = TrolleyError::Validation {
            message: "amount is required".into(),
        };
        assert_eq!(validation.upstream_status(), None);
    }

    #[test]
    fn total_not_found_display_matches_wire_message() {
        assert_eq!(
            TrolleyError::TotalNotFound.to_string(),
            "Total amount not found in checkout response"
        );
    }

    #[test]
    fn validation_error_displays_bare_message() {
        let err = TrolleyError::Validation {
            message: "Messages are required".into(),
        };
        assert_eq!(err.to_string(), "Messages are required");
    }
}
