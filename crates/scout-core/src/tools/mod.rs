//! Tool abstraction shared by the guard, the pipeline and tool providers

pub mod error;
pub mod provider;
pub mod tool;
pub mod tool_set;
pub mod types;

pub use error::ToolError;
pub use provider::{ProviderCloser, ToolProvider};
pub use tool::Tool;
pub use tool_set::ToolSet;
pub use types::{ToolCall, ToolResult, ToolSchema};
