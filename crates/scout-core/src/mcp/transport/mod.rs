//! MCP transport layer
//!
//! Only the stdio transport is implemented: tool servers are spawned as child
//! processes and spoken to over newline-delimited JSON.

pub mod stdio;

pub use stdio::StdioTransport;

use super::error::McpError;
use super::protocol::McpMessage;
use async_trait::async_trait;

/// Framed, bidirectional channel to one MCP server.
///
/// Sending and receiving must be usable concurrently: the client keeps one
/// task parked in `receive` while requests are sent from others.
#[async_trait]
pub trait McpTransport: Send + Sync {
    async fn send(&self, message: McpMessage) -> Result<(), McpError>;

    /// Next frame from the server; an error ends the client's receive loop
    async fn receive(&self) -> Result<McpMessage, McpError>;

    /// Stop the server side. Must not depend on the receive loop still running.
    async fn close(&self) -> Result<(), McpError>;

    fn is_connected(&self) -> bool;
}
