//! MCP tool operations

use super::McpClient;
use super::super::error::McpError;
use super::super::protocol::methods;
use super::super::types::{McpTool, McpToolResult};
use serde_json::{Value, json};
use tracing::instrument;

#[derive(serde::Deserialize)]
struct ToolsPage {
    #[serde(default)]
    tools: Vec<McpTool>,
    #[serde(default, rename = "nextCursor")]
    next_cursor: Option<String>,
}

impl McpClient {
    /// List available tools, following pagination cursors
    #[instrument(skip(self), level = "debug")]
    pub async fn list_tools(&self) -> Result<Vec<McpTool>, McpError> {
        self.ensure_initialized()?;

        let mut tools = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let params = cursor.as_ref().map(|c| json!({ "cursor": c }));
            let page: ToolsPage = self.call(methods::TOOLS_LIST, params).await?;
            tools.extend(page.tools);
            match page.next_cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        *self.tools.write().await = tools.clone();
        Ok(tools)
    }

    /// Call a tool by name
    #[instrument(skip(self, arguments), fields(tool_name = %name))]
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<McpToolResult, McpError> {
        self.ensure_initialized()?;

        let params = json!({
            "name": name,
            "arguments": arguments
        });

        self.call(methods::TOOLS_CALL, Some(params)).await
    }

    /// Ping the server
    pub async fn ping(&self) -> Result<(), McpError> {
        let _: Value = self.call(methods::PING, None).await?;
        Ok(())
    }
}
