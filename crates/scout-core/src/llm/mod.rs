//! LLM client: message types, the provider seam and the Gemini backend

pub mod converters;
pub mod google;
pub mod messages;
pub mod parsers;
pub mod provider;

pub use google::GoogleProvider;
pub use messages::{LlmMessage, LlmResponse, LlmUsage, MessageRole};
pub use provider::LlmProvider;

#[cfg(test)]
pub use provider::MockLlmProvider;
