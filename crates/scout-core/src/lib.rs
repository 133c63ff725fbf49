//! Scout Core Library
//!
//! This crate provides the core of the Scout web research tool: the MCP
//! client, the once-only tool initialization guard, the Gemini client and
//! the plan → research → publish pipeline.

pub mod config;
pub mod error;
pub mod guard;
pub mod llm;
pub mod mcp;
pub mod pipeline;
pub mod tools;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use config::{Config, ConfigLoader, McpServerConfig};
pub use error::{ScoutError, ScoutResult, UnifiedError};
pub use guard::{
    ExitHook, InitPolicy, InitializationGuard, InitializationState, RetryNotice, ToolConsumer,
    TriggerContext,
};
pub use llm::{GoogleProvider, LlmMessage, LlmProvider, LlmResponse};
pub use pipeline::{AgentPipeline, PipelineOptions, PipelineOutcome, PipelineRun};
pub use tools::{ProviderCloser, Tool, ToolCall, ToolProvider, ToolResult, ToolSchema, ToolSet};
