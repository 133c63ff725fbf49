//! Scout: plan, research and publish web research reports
//!
//! Facade over the workspace crates. `scout_core` holds the MCP client, the
//! tool initialization guard and the agent pipeline; `scout_tools` provides
//! the MCP-backed tool provider.

pub use scout_core as core;
pub use scout_tools as tools;

pub use scout_core::{
    AgentPipeline, Config, ConfigLoader, ExitHook, InitPolicy, InitializationGuard,
    InitializationState, PipelineOutcome, PipelineRun, RetryNotice, ScoutError, ScoutResult,
    ToolSet, TriggerContext,
};
pub use scout_tools::McpToolProvider;
