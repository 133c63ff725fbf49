//! Conversions into `ScoutError`

use super::types::ScoutError;
use crate::mcp::McpError;

impl From<reqwest::Error> for ScoutError {
    fn from(error: reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        // Query strings may carry credentials; keep them out of logs
        let url = error.url().map(|u| {
            let mut u = u.clone();
            u.set_query(None);
            u.to_string()
        });
        Self::Http {
            message: error.without_url().to_string(),
            url,
            status_code,
            context: None,
        }
    }
}

/// Every MCP failure surfaces as a provider connection failure
impl From<McpError> for ScoutError {
    fn from(error: McpError) -> Self {
        Self::connection_with_context(error.to_string(), format!("MCP {}", error.kind()))
    }
}
