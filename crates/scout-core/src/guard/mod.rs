//! Lazy, once-only connection to the tool provider
//!
//! [`InitializationGuard`] owns the connection lifecycle. Agents that need
//! tools ask it through [`InitializationGuard::on_trigger_without_tools`],
//! which never waits, and consumers registered with
//! [`InitializationGuard::notify_ready`] receive the [`ToolSet`] once.
//! [`ExitHook`] closes the connection at shutdown.
//!
//! [`ToolSet`]: crate::tools::ToolSet

pub mod exit_hook;
pub mod init_guard;
pub mod policy;
pub mod state;

pub use exit_hook::ExitHook;
pub use init_guard::{InitializationGuard, ToolConsumer};
pub use policy::InitPolicy;
pub use state::{InitializationState, RETRY_MESSAGE, RetryNotice, TriggerContext};

#[cfg(test)]
mod tests;
