//! UnifiedError trait implementation for ScoutError

use super::types::{ScoutError, UnifiedError};

impl UnifiedError for ScoutError {
    fn error_code(&self) -> &str {
        match self {
            Self::Config { .. } => "SCOUT_CONFIG",
            Self::Connection { .. } => "SCOUT_CONNECTION",
            Self::Close { .. } => "SCOUT_CLOSE",
            Self::InitExhausted { .. } => "SCOUT_INIT_EXHAUSTED",
            Self::Llm { .. } => "SCOUT_LLM",
            Self::Agent { .. } => "SCOUT_AGENT",
            Self::Http { .. } => "SCOUT_HTTP",
            Self::InvalidInput { .. } => "SCOUT_INVALID_INPUT",
            Self::Cancelled => "SCOUT_CANCELLED",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Config { message, .. } => message,
            Self::Connection { message, .. } => message,
            Self::Close { message, .. } => message,
            Self::InitExhausted { last_error, .. } => last_error,
            Self::Llm { message, .. } => message,
            Self::Agent { message, .. } => message,
            Self::Http { message, .. } => message,
            Self::InvalidInput { message, .. } => message,
            Self::Cancelled => "Task was cancelled",
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. }
            | Self::Connection { context, .. }
            | Self::Close { context, .. }
            | Self::Llm { context, .. }
            | Self::Agent { context, .. }
            | Self::Http { context, .. }
            | Self::InvalidInput { context, .. } => context.as_deref(),
            Self::InitExhausted { .. } | Self::Cancelled => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::Http { .. } | Self::Llm { .. }
        )
    }
}
