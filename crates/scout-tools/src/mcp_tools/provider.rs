//! Tool provider backed by an MCP server child process

use super::adapter::create_adapters_from_client;
use async_trait::async_trait;
use scout_core::config::McpServerConfig;
use scout_core::error::{ScoutError, ScoutResult};
use scout_core::mcp::{McpClient, McpTransport, StdioTransport};
use scout_core::mcp::client::DEFAULT_REQUEST_TIMEOUT_SECS;
use scout_core::tools::{ProviderCloser, Tool, ToolProvider, ToolSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Starts the configured MCP server and exposes its tools
pub struct McpToolProvider {
    config: McpServerConfig,
}

impl McpToolProvider {
    pub fn new(config: McpServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &McpServerConfig {
        &self.config
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS))
    }
}

impl std::fmt::Debug for McpToolProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpToolProvider")
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl ToolProvider for McpToolProvider {
    fn name(&self) -> &str {
        &self.config.command
    }

    async fn connect(&self) -> ScoutResult<(ToolSet, Box<dyn ProviderCloser>)> {
        let missing = self.config.missing_credentials();
        if !missing.is_empty() {
            warn!(missing = ?missing, "MCP server credentials not set");
        }

        let transport = StdioTransport::spawn(&self.config).await.map_err(|e| {
            ScoutError::from(e).with_context(format!("Starting MCP server '{}'", self.config.command))
        })?;
        let client = Arc::new(McpClient::with_timeout(
            Arc::new(transport),
            self.request_timeout(),
        ));

        connect_client(client).await
    }
}

/// Handshake and list tools on an already constructed client.
///
/// The client is closed again if either step fails.
pub async fn connect_client(
    client: Arc<McpClient>,
) -> ScoutResult<(ToolSet, Box<dyn ProviderCloser>)> {
    match handshake(&client).await {
        Ok(tools) => {
            let closer = McpCloser { client };
            Ok((tools, Box::new(closer)))
        }
        Err(error) => {
            if let Err(e) = client.close().await {
                warn!(error = %e, "Failed to stop MCP server after a failed connect");
            }
            Err(error)
        }
    }
}

/// Connect through an arbitrary transport
pub async fn connect_transport(
    transport: Arc<dyn McpTransport>,
) -> ScoutResult<(ToolSet, Box<dyn ProviderCloser>)> {
    connect_client(Arc::new(McpClient::new(transport))).await
}

async fn handshake(client: &Arc<McpClient>) -> ScoutResult<ToolSet> {
    let server = client.initialize().await?;
    let adapters = create_adapters_from_client(client).await?;
    info!(
        server = %server.name,
        version = %server.version,
        tools = adapters.len(),
        "MCP toolset created"
    );

    Ok(ToolSet::new(
        adapters
            .into_iter()
            .map(|adapter| Arc::new(adapter) as Arc<dyn Tool>),
    ))
}

/// Closes the MCP client and stops the server process
struct McpCloser {
    client: Arc<McpClient>,
}

#[async_trait]
impl ProviderCloser for McpCloser {
    async fn close(&self) -> ScoutResult<()> {
        info!("Closing MCP server connection");
        self.client
            .close()
            .await
            .map_err(|e| ScoutError::close(e.to_string()))
    }
}
