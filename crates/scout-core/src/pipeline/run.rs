//! Values produced by a pipeline run

use crate::guard::RetryNotice;
use crate::llm::LlmUsage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One tool invocation made by the researcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub tool_name: String,
    pub success: bool,
    pub execution_time_ms: Option<u64>,
}

/// What the research stage produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Findings {
    pub text: String,
    pub tool_calls: Vec<ToolCallRecord>,
    /// LLM turns spent, including the wrap-up turn
    pub steps: u32,
    /// Whether the tool budget ran out before the model finished
    pub budget_exhausted: bool,
}

/// A completed plan → findings → report run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    pub id: Uuid,
    pub topic: String,
    pub plan: String,
    pub findings: Findings,
    pub report: String,
    pub usage: LlmUsage,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Result of [`AgentPipeline::run`](super::AgentPipeline::run)
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    /// Tools are not ready; retry later, optionally reusing the plan
    Retry { notice: RetryNotice, plan: String },
    Completed(Box<PipelineRun>),
}

impl PipelineOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, PipelineOutcome::Completed(_))
    }
}
