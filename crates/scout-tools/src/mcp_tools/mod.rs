//! MCP (Model Context Protocol) tools integration
//!
//! [`McpToolProvider`] starts the configured MCP server, performs the
//! handshake and wraps every listed tool in an [`McpToolAdapter`].
//!
//! ```rust,ignore
//! use scout_core::config::McpServerConfig;
//! use scout_core::guard::{InitPolicy, InitializationGuard};
//! use scout_tools::McpToolProvider;
//!
//! let provider = McpToolProvider::new(McpServerConfig::default());
//! let guard = InitializationGuard::new(Arc::new(provider), InitPolicy::default());
//! let tools = guard.ensure_initialized().await?;
//! ```

pub mod adapter;
pub mod provider;

pub use adapter::{McpToolAdapter, create_adapters_from_client};
pub use provider::{McpToolProvider, connect_client, connect_transport};
