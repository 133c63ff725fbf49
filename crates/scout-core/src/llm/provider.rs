//! LLM provider seam

use super::messages::{LlmMessage, LlmResponse};
use crate::error::ScoutResult;
use crate::tools::ToolSchema;
use async_trait::async_trait;

/// A chat-completion backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send the conversation, offering `tools` (empty for none)
    async fn chat(&self, messages: &[LlmMessage], tools: &[ToolSchema]) -> ScoutResult<LlmResponse>;
}
