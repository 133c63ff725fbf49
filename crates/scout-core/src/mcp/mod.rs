//! Model Context Protocol (MCP) client
//!
//! Scout talks to its web tools (search, scraping, browser automation)
//! through an MCP server running as a child process.
//!
//! ```rust,ignore
//! use scout_core::config::McpServerConfig;
//! use scout_core::mcp::{McpClient, StdioTransport};
//!
//! let config = McpServerConfig::stdio("npx", vec!["-y".into(), "@brightdata/mcp".into()]);
//! let transport = StdioTransport::spawn(&config).await?;
//! let client = McpClient::new(Arc::new(transport));
//!
//! client.initialize().await?;
//! let tools = client.list_tools().await?;
//! ```

pub mod client;
pub mod error;
pub mod protocol;
pub mod transport;
pub mod types;

pub use client::McpClient;
pub use error::McpError;
pub use protocol::{McpMessage, McpNotification, McpRequest, McpResponse, McpRpcError, RequestId};
pub use transport::{McpTransport, StdioTransport};
pub use types::{McpContent, McpServerInfo, McpTool, McpToolResult};
