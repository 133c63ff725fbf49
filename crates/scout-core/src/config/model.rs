//! Configuration data models

use super::logging_config::LoggingConfig;
use super::mcp_config::McpServerConfig;
use crate::guard::InitPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default Gemini REST endpoint
pub const DEFAULT_GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// LLM settings
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Provider name; only "google" is supported
    pub provider: String,
    /// Model name/ID
    pub model: String,
    /// API key for the provider
    pub api_key: Option<String>,
    /// Base URL for the API
    pub base_url: Option<String>,
    /// Temperature (0.0 to 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "google".to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: None,
            temperature: Some(0.7),
            max_tokens: Some(8192),
        }
    }
}

impl ModelConfig {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_GOOGLE_BASE_URL)
    }
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Research pipeline settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Maximum LLM turns the researcher may spend calling tools
    pub max_tool_steps: u32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self { max_tool_steps: 8 }
    }
}

/// Complete Scout configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub mcp: McpServerConfig,
    pub init: InitPolicy,
    pub pipeline: PipelineOptions,
    pub logging: LoggingConfig,
}
