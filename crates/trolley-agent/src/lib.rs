// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversational commerce agent for the Trolley bridge.
//!
//! [`ChatEngine`] turns one inbound message history into a final assistant
//! reply: it invokes the model, executes any requested commerce actions
//! ([`ToolAction`]), feeds the results back, and returns the follow-up
//! response. At most two model invocations happen per turn.
//!
//! Backend actions (`list_products`, `complete_checkout`) run here against
//! the seller and payment clients. Frontend actions (`add_to_cart`,
//! `start_checkout`) are acknowledged synthetically and reported back via
//! `original_tool_calls` for the caller to apply.

pub mod engine;
pub mod tools;

pub use crate::engine::{ChatEngine, ChatReply, MAX_MODEL_ROUNDS};
pub use crate::tools::{commerce_tools, AddToCartArgs, CompleteCheckoutArgs, ToolAction};
