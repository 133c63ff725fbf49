//! Core error types and traits for Scout

use thiserror::Error;

/// Result type alias for Scout operations
pub type ScoutResult<T> = Result<T, ScoutError>;

/// Stable code, plain message and optional context for an error, plus a
/// hint on whether repeating the operation may help
pub trait UnifiedError: std::error::Error + Send + Sync {
    fn error_code(&self) -> &str;

    fn message(&self) -> &str;

    fn context(&self) -> Option<&str> {
        None
    }

    fn is_retryable(&self) -> bool {
        false
    }
}

#[derive(Error, Debug, Clone)]
pub enum ScoutError {
    /// Missing or invalid configuration
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// The tool provider could not be started or its handshake failed
    #[error("Tool provider connection failed: {message}")]
    Connection {
        message: String,
        context: Option<String>,
    },

    /// Closing the tool provider connection failed
    #[error("Tool provider close failed: {message}")]
    Close {
        message: String,
        context: Option<String>,
    },

    /// Initialization gave up after too many consecutive failures
    #[error("Tool initialization gave up after {attempts} failed attempts: {last_error}")]
    InitExhausted { attempts: u32, last_error: String },

    /// Model request failed, tagged with the stage when raised by the pipeline
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        provider: Option<String>,
        context: Option<String>,
    },

    /// The pipeline reached a state it cannot continue from
    #[error("Agent error: {message}")]
    Agent {
        message: String,
        context: Option<String>,
    },

    /// Transport failure talking to the model endpoint
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        url: Option<String>,
        status_code: Option<u16>,
        context: Option<String>,
    },

    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
        context: Option<String>,
    },

    /// The guard was closed before or during the operation
    #[error("Task was cancelled")]
    Cancelled,
}
