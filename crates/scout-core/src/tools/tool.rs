//! Core Tool trait definition

use super::error::ToolError;
use super::types::{ToolCall, ToolResult, ToolSchema};
use async_trait::async_trait;
use std::time::Instant;

/// A named capability handed to the research agent.
///
/// Tools are owned by the provider connection that produced them and stay
/// usable until the connection is closed.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable tool name (e.g. "search_engine")
    fn name(&self) -> &str;

    /// Description for the LLM
    fn description(&self) -> &str;

    /// JSON schema for the input parameters
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with the given arguments
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError>;

    /// Execute the tool, converting errors into a failed `ToolResult` and
    /// recording the elapsed time.
    async fn execute_with_timing(&self, call: &ToolCall) -> ToolResult {
        let started = Instant::now();
        let result = match self.execute(call).await {
            Ok(result) => result,
            Err(err) => ToolResult::error(&call.id, self.name(), err.to_string()),
        };
        result.with_elapsed(started.elapsed())
    }
}
