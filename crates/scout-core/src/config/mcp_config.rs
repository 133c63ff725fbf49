//! MCP tool server configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Environment keys the Bright Data MCP server reads its credentials from
pub const BRIGHTDATA_ENV_KEYS: [&str; 3] = ["API_TOKEN", "WEB_UNLOCKER_ZONE", "BROWSER_AUTH"];

fn default_command() -> String {
    "npx".to_string()
}

fn default_args() -> Vec<String> {
    vec!["-y".to_string(), "@brightdata/mcp".to_string()]
}

/// How to launch the MCP tool server.
///
/// `env` usually carries credentials. It is forwarded to the child process
/// unchanged, and the `Debug` impl prints only its keys.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct McpServerConfig {
    /// Command to execute
    #[serde(default = "default_command")]
    pub command: String,
    /// Command arguments
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    /// Environment variables for the server process
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Per-request timeout in seconds (defaults to the client's 300 s)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for McpServerConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            args: default_args(),
            env: BTreeMap::new(),
            timeout_secs: None,
        }
    }
}

impl McpServerConfig {
    /// Create a stdio server config
    pub fn stdio(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            env: BTreeMap::new(),
            timeout_secs: None,
        }
    }

    /// Add environment variable
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Names of the configured environment variables, safe to log
    pub fn env_keys(&self) -> Vec<&str> {
        self.env.keys().map(String::as_str).collect()
    }

    /// Credential keys the Bright Data server expects but that are unset or empty
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        BRIGHTDATA_ENV_KEYS
            .iter()
            .copied()
            .filter(|key| self.env.get(*key).is_none_or(|v| v.trim().is_empty()))
            .collect()
    }
}

impl fmt::Debug for McpServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let env: BTreeMap<&str, &str> = self
            .env
            .keys()
            .map(|k| (k.as_str(), "<redacted>"))
            .collect();
        f.debug_struct("McpServerConfig")
            .field("command", &self.command)
            .field("args", &self.args)
            .field("env", &env)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
