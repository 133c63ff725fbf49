//! Failures raised by the MCP client and its transports

use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum McpError {
    /// The server process could not be reached, or went away
    #[error("MCP connection error: {0}")]
    Connection(String),

    /// Reading from or writing to an open connection failed
    #[error("MCP transport error: {0}")]
    Transport(String),

    /// JSON-RPC error object returned by the server
    #[error("MCP server error {code}: {message}")]
    Server { code: i32, message: String },

    #[error("MCP request timed out after {0} seconds")]
    Timeout(u64),

    #[error("MCP payload could not be decoded: {0}")]
    Serialization(String),

    #[error("MCP client not initialized")]
    NotInitialized,

    #[error("MCP client already initialized")]
    AlreadyInitialized,
}

impl McpError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Short tag for logs and error context
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connection(_) => "connection",
            Self::Transport(_) => "transport",
            Self::Server { .. } => "server",
            Self::Timeout(_) => "timeout",
            Self::Serialization(_) => "serialization",
            Self::NotInitialized => "not-initialized",
            Self::AlreadyInitialized => "already-initialized",
        }
    }

    /// Whether the connection itself is suspect, as opposed to one request
    pub fn is_connection_loss(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Transport(_) | Self::NotInitialized)
    }
}

impl From<serde_json::Error> for McpError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for McpError {
    fn from(err: std::io::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
