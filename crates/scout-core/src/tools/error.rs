//! Failures a tool reports back to the agent

/// Why a tool call did not produce a result.
///
/// The agent never aborts on these; each is turned into a failed
/// [`ToolResult`](super::ToolResult) the model can read.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ToolError {
    /// The provider rejected the arguments
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Tool execution timeout")]
    Timeout,

    /// The provider connection behind the tool is gone
    #[error("Tool provider unavailable: {0}")]
    Unavailable(String),
}

impl ToolError {
    /// Whether calling again, later, may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ToolError::Timeout | ToolError::Unavailable(_))
    }
}
