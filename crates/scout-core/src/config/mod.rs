//! Configuration: JSON file, then environment overrides, then validation

pub mod env_loader;
pub mod file_loader;
pub mod loader;
pub mod logging_config;
pub mod mcp_config;
pub mod model;
pub mod validation;

pub use env_loader::{apply_env_overrides, apply_overrides};
pub use file_loader::load_from_file;
pub use loader::{ConfigLoader, DEFAULT_CONFIG_FILE, load_config};
pub use logging_config::{LogFormat, LoggingConfig};
pub use mcp_config::{BRIGHTDATA_ENV_KEYS, McpServerConfig};
pub use model::{Config, DEFAULT_GOOGLE_BASE_URL, DEFAULT_MODEL, ModelConfig, PipelineOptions};
pub use validation::ConfigValidator;
