//! Exposes each tool listed by the MCP server as a Scout [`Tool`]

use async_trait::async_trait;
use scout_core::mcp::{McpClient, McpError, McpTool, McpToolResult};
use scout_core::tools::{Tool, ToolCall, ToolError, ToolResult, ToolSchema};
use serde_json::json;
use std::sync::Arc;

/// One listed MCP tool, called through the shared client
#[derive(Clone)]
pub struct McpToolAdapter {
    mcp_tool: McpTool,
    client: Arc<McpClient>,
}

impl McpToolAdapter {
    pub fn new(mcp_tool: McpTool, client: Arc<McpClient>) -> Self {
        Self { mcp_tool, client }
    }

    pub fn mcp_tool(&self) -> &McpTool {
        &self.mcp_tool
    }

    /// Input schema with a fallback for servers that send none
    fn input_schema(&self) -> serde_json::Value {
        let schema = &self.mcp_tool.input_schema;
        if schema.is_object() {
            schema.clone()
        } else {
            json!({"type": "object", "properties": {}})
        }
    }

    fn convert_result(&self, call: &ToolCall, mcp_result: McpToolResult) -> ToolResult {
        let text = mcp_result.text();
        if mcp_result.is_error {
            let message = if text.is_empty() {
                "MCP tool execution failed".to_string()
            } else {
                text
            };
            ToolResult::error(&call.id, self.name(), message)
        } else {
            ToolResult::success(&call.id, self.name(), text)
        }
    }
}

impl std::fmt::Debug for McpToolAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpToolAdapter")
            .field("name", &self.mcp_tool.name)
            .finish()
    }
}

fn to_tool_error(error: McpError) -> ToolError {
    match error {
        McpError::Timeout(_) => ToolError::Timeout,
        McpError::Server { code: -32602, message } => ToolError::InvalidArguments(message),
        e if e.is_connection_loss() => ToolError::Unavailable(e.to_string()),
        other => ToolError::ExecutionFailed(format!("MCP tool call failed: {}", other)),
    }
}

#[async_trait]
impl Tool for McpToolAdapter {
    fn name(&self) -> &str {
        &self.mcp_tool.name
    }

    fn description(&self) -> &str {
        self.mcp_tool.description.as_deref().unwrap_or("MCP tool")
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(self.name(), self.description(), self.input_schema())
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let result = self
            .client
            .call_tool(&self.mcp_tool.name, call.arguments_value())
            .await
            .map_err(to_tool_error)?;

        Ok(self.convert_result(call, result))
    }
}

/// Wrap every tool the client lists
pub async fn create_adapters_from_client(
    client: &Arc<McpClient>,
) -> Result<Vec<McpToolAdapter>, McpError> {
    let tools = client.list_tools().await?;
    Ok(tools
        .into_iter()
        .map(|tool| McpToolAdapter::new(tool, Arc::clone(client)))
        .collect())
}
