//! Layered configuration loading

use super::env_loader::apply_env_overrides;
use super::file_loader::load_from_file;
use super::model::Config;
use super::validation::ConfigValidator;
use crate::error::ScoutResult;
use std::path::PathBuf;
use tracing::debug;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "scout_config.json";

/// Loads the config file, then applies environment overrides, then validates
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    use_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            file: None,
            use_env: true,
        }
    }

    /// Read this file first; a missing file means defaults
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Skip environment overrides
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    pub fn load(&self) -> ScoutResult<Config> {
        let mut config = match &self.file {
            Some(path) => {
                debug!(path = %path.display(), "Loading configuration file");
                load_from_file(path)?
            }
            None => Config::default(),
        };

        if self.use_env {
            apply_env_overrides(&mut config)?;
        }

        ConfigValidator::validate(&config)?;
        Ok(config)
    }
}

/// Load `scout_config.json` from the working directory plus the environment
pub fn load_config() -> ScoutResult<Config> {
    ConfigLoader::new().with_file(DEFAULT_CONFIG_FILE).load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validation_runs_after_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scout_config.json");
        fs::write(&path, r#"{"pipeline": {"max_tool_steps": 0}}"#).unwrap();

        let result = ConfigLoader::new().with_file(&path).without_env().load();
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults_without_file() {
        let config = ConfigLoader::new().without_env().load().unwrap();
        assert_eq!(config, Config::default());
    }
}
