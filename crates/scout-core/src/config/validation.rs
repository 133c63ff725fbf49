//! Configuration validation

use super::model::Config;
use crate::error::{ScoutError, ScoutResult};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration
    pub fn validate(config: &Config) -> ScoutResult<()> {
        Self::validate_model(config)?;
        Self::validate_mcp(config)?;
        Self::validate_limits(config)?;
        Ok(())
    }

    fn validate_model(config: &Config) -> ScoutResult<()> {
        if config.model.provider != "google" {
            return Err(ScoutError::config(format!(
                "Unknown provider '{}'. Only 'google' is supported",
                config.model.provider
            )));
        }

        if config.model.model.trim().is_empty() {
            return Err(ScoutError::config("Model name cannot be empty"));
        }

        if let Some(temperature) = config.model.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ScoutError::config(format!(
                    "Temperature must be between 0.0 and 2.0, got {}",
                    temperature
                )));
            }
        }

        Ok(())
    }

    fn validate_mcp(config: &Config) -> ScoutResult<()> {
        if config.mcp.command.trim().is_empty() {
            return Err(ScoutError::config("MCP server command cannot be empty"));
        }

        if config.mcp.timeout_secs == Some(0) {
            return Err(ScoutError::config("MCP request timeout must be greater than 0"));
        }

        Ok(())
    }

    fn validate_limits(config: &Config) -> ScoutResult<()> {
        if config.pipeline.max_tool_steps == 0 {
            return Err(ScoutError::config("max_tool_steps must be greater than 0"));
        }

        if config.init.max_attempts == Some(0) {
            return Err(ScoutError::config("init.max_attempts must be greater than 0"));
        }

        if config.init.initial_backoff > config.init.max_backoff {
            return Err(ScoutError::config(
                "init.initial_backoff cannot exceed init.max_backoff",
            ));
        }

        Ok(())
    }
}
