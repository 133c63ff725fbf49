//! Initialization state and the values handed to callers

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Message shown whenever tools are not ready yet
pub const RETRY_MESSAGE: &str = "Tools are initializing, please retry shortly.";

/// Lifecycle of the tool provider connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitializationState {
    Uninitialized,
    InProgress,
    Ready,
    Failed,
}

impl fmt::Display for InitializationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InitializationState::Uninitialized => "uninitialized",
            InitializationState::InProgress => "in_progress",
            InitializationState::Ready => "ready",
            InitializationState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Who asked for tools before they were available
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerContext {
    /// Agent whose turn needs tools
    pub agent_name: String,
    /// Identifies the invocation in logs
    pub invocation_id: Uuid,
}

impl TriggerContext {
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            invocation_id: Uuid::new_v4(),
        }
    }
}

/// Tells the caller that tools are not ready and the turn should be retried
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryNotice {
    pub message: String,
    pub agent_name: String,
    pub invocation_id: Uuid,
}

impl RetryNotice {
    pub(crate) fn for_trigger(ctx: &TriggerContext) -> Self {
        Self {
            message: RETRY_MESSAGE.to_string(),
            agent_name: ctx.agent_name.clone(),
            invocation_id: ctx.invocation_id,
        }
    }
}

impl fmt::Display for RetryNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
