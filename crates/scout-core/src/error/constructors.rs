//! Constructor methods for ScoutError

use super::types::ScoutError;

impl ScoutError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            context: None,
        }
    }

    pub fn connection_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    pub fn close(message: impl Into<String>) -> Self {
        Self::Close {
            message: message.into(),
            context: None,
        }
    }

    pub fn init_exhausted(attempts: u32, last_error: impl Into<String>) -> Self {
        Self::InitExhausted {
            attempts,
            last_error: last_error.into(),
        }
    }

    pub fn llm_with_provider(message: impl Into<String>, provider: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
            provider: Some(provider.into()),
            context: None,
        }
    }

    pub fn agent(message: impl Into<String>) -> Self {
        Self::Agent {
            message: message.into(),
            context: None,
        }
    }

    /// Rejected input, naming the offending field
    pub fn invalid_input_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
            context: None,
        }
    }

    /// Attach context to any variant that carries it
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let ctx = Some(context.into());
        match &mut self {
            Self::Config { context: c, .. }
            | Self::Connection { context: c, .. }
            | Self::Close { context: c, .. }
            | Self::Llm { context: c, .. }
            | Self::Agent { context: c, .. }
            | Self::Http { context: c, .. }
            | Self::InvalidInput { context: c, .. } => *c = ctx,
            Self::InitExhausted { .. } | Self::Cancelled => {}
        }
        self
    }
}
