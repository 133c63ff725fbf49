//! Payloads of the MCP methods the client uses

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// `serverInfo` from the initialize reply
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpServerInfo {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub protocol_version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpCapabilities {
    #[serde(default)]
    pub tools: Option<ToolCapabilities>,
    /// Everything besides `tools`, untouched
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCapabilities {
    #[serde(default)]
    pub list_changed: bool,
}

/// One entry of a `tools/list` page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpTool {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// JSON Schema of the arguments; servers may omit it
    #[serde(default)]
    pub input_schema: Value,
}

/// Reply to `tools/call`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpToolResult {
    #[serde(default)]
    pub content: Vec<McpContent>,
    /// The tool ran but reported a failure in `content`
    #[serde(default)]
    pub is_error: bool,
}

impl McpToolResult {
    /// Text parts joined by newlines, with placeholders for the rest
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(McpContent::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum McpContent {
    Text {
        text: String,
    },
    Image {
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
    Resource {
        resource: McpResourceRef,
    },
    /// Content kinds this client does not render (audio, links, ...)
    #[serde(other)]
    Unsupported,
}

impl McpContent {
    fn as_text(&self) -> String {
        match self {
            Self::Text { text } => text.clone(),
            Self::Image { mime_type } => format!("[image: {}]", mime_type),
            Self::Resource { resource } => resource
                .text
                .clone()
                .unwrap_or_else(|| format!("[resource: {}]", resource.uri)),
            Self::Unsupported => "[unsupported content]".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpResourceRef {
    pub uri: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InitializeParams {
    pub protocol_version: String,
    pub capabilities: ClientCapabilities,
    pub client_info: ClientInfo,
}

/// The client offers no optional capabilities; serialises as `{}`
#[derive(Debug, Clone, Default, Serialize)]
pub(crate) struct ClientCapabilities {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            name: "scout".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InitializeResult {
    pub protocol_version: String,
    #[serde(default)]
    pub capabilities: McpCapabilities,
    pub server_info: McpServerInfo,
}
