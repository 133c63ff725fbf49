//! CLI commands

pub mod research;
pub mod tools;

use scout_core::config::Config;
use scout_core::guard::InitializationGuard;
use scout_tools::McpToolProvider;
use std::sync::Arc;

/// Guard over the configured MCP tool server
pub fn build_guard(config: &Config) -> InitializationGuard {
    let provider = McpToolProvider::new(config.mcp.clone());
    InitializationGuard::new(Arc::new(provider), config.init.clone())
}
