//! Tool providers for Scout

pub mod mcp_tools;

pub use mcp_tools::{McpToolAdapter, McpToolProvider};
