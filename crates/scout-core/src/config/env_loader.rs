//! Environment variable overrides

use super::mcp_config::BRIGHTDATA_ENV_KEYS;
use super::model::Config;
use crate::error::{ScoutError, ScoutResult};
use std::env;

/// Apply overrides from the process environment
pub fn apply_env_overrides(config: &mut Config) -> ScoutResult<()> {
    apply_overrides(config, |key| env::var(key).ok())
}

/// Apply overrides read through `lookup`.
///
/// Provider settings come from `GOOGLE_*`, tool server credentials from the
/// variables the Bright Data server reads, and general settings from
/// `SCOUT_*`. Empty values are ignored.
pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> ScoutResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(api_key) = get("GOOGLE_API_KEY") {
        config.model.api_key = Some(api_key);
    }
    if let Some(model) = get("GOOGLE_MODEL") {
        config.model.model = model;
    }
    if let Some(base_url) = get("GOOGLE_BASE_URL") {
        config.model.base_url = Some(base_url);
    }

    for key in BRIGHTDATA_ENV_KEYS {
        if let Some(value) = get(key) {
            config.mcp.env.insert(key.to_string(), value);
        }
    }

    if let Some(command) = get("SCOUT_MCP_COMMAND") {
        config.mcp.command = command;
    }

    if let Some(level) = get("SCOUT_LOG_LEVEL") {
        config.logging.level = level;
    }

    if let Some(steps) = get("SCOUT_MAX_TOOL_STEPS") {
        config.pipeline.max_tool_steps = steps.trim().parse().map_err(|_| {
            ScoutError::config_with_context(
                "Invalid SCOUT_MAX_TOOL_STEPS value",
                format!("Parsing '{}' as a step count", steps),
            )
        })?;
    }

    Ok(())
}
