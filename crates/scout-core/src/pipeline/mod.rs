//! Plan → research → publish pipeline
//!
//! The planner and publisher are single LLM turns. The research stage runs a
//! tool loop over the [`ToolSet`](crate::tools::ToolSet) handed over by the
//! [`InitializationGuard`]. When tools are not ready yet, a run stops after
//! planning and returns [`PipelineOutcome::Retry`].

pub mod prompts;
pub mod research;
pub mod run;

pub use crate::config::PipelineOptions;
pub use prompts::AgentSpec;
pub use research::ResearchStage;
pub use run::{Findings, PipelineOutcome, PipelineRun, ToolCallRecord};

use crate::error::{ScoutError, ScoutResult};
use crate::guard::{InitializationGuard, TriggerContext};
use crate::llm::{LlmMessage, LlmProvider, LlmUsage};
use chrono::Utc;
use prompts::{PLANNER, PUBLISHER, RESEARCHER, planner_input, publisher_input};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Pipeline stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Planner,
    Researcher,
    Publisher,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Planner, Stage::Researcher, Stage::Publisher];

    pub fn spec(&self) -> &'static AgentSpec {
        match self {
            Stage::Planner => &PLANNER,
            Stage::Researcher => &RESEARCHER,
            Stage::Publisher => &PUBLISHER,
        }
    }
}

/// Drives the three agents for one topic at a time
pub struct AgentPipeline {
    provider: Arc<dyn LlmProvider>,
    guard: InitializationGuard,
    research: Arc<ResearchStage>,
    options: PipelineOptions,
}

impl AgentPipeline {
    /// Build the pipeline and register its research stage for the tool hand-off
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        guard: InitializationGuard,
        options: PipelineOptions,
    ) -> Self {
        let research = Arc::new(ResearchStage::new());
        guard.notify_ready(research.clone());
        Self {
            provider,
            guard,
            research,
            options,
        }
    }

    pub fn guard(&self) -> &InitializationGuard {
        &self.guard
    }

    pub fn research_stage(&self) -> &ResearchStage {
        &self.research
    }

    /// Plan, then research and publish if tools are ready
    #[instrument(skip(self), level = "debug")]
    pub async fn run(&self, topic: &str) -> ScoutResult<PipelineOutcome> {
        let topic = validate_topic(topic)?;
        let started_at = Utc::now();
        let mut usage = LlmUsage::default();
        let plan = self.plan(topic, &mut usage).await?;
        self.continue_run(topic, plan, started_at, usage).await
    }

    /// Research and publish with a plan from an earlier `Retry` outcome
    #[instrument(skip(self, plan), level = "debug")]
    pub async fn resume(&self, topic: &str, plan: String) -> ScoutResult<PipelineOutcome> {
        let topic = validate_topic(topic)?;
        self.continue_run(topic, plan, Utc::now(), LlmUsage::default())
            .await
    }

    async fn plan(&self, topic: &str, usage: &mut LlmUsage) -> ScoutResult<String> {
        info!(stage = PLANNER.name, "Planning research");
        let messages = [
            LlmMessage::system(PLANNER.instruction),
            LlmMessage::user(planner_input(topic)),
        ];
        let response = self
            .provider
            .chat(&messages, &[])
            .await
            .map_err(|e| stage_error(Stage::Planner, e))?;
        if let Some(u) = &response.usage {
            usage.add(u);
        }
        Ok(response.content)
    }

    async fn continue_run(
        &self,
        topic: &str,
        plan: String,
        started_at: chrono::DateTime<Utc>,
        mut usage: LlmUsage,
    ) -> ScoutResult<PipelineOutcome> {
        let ctx = TriggerContext::new(RESEARCHER.name);
        if let Some(notice) = self.guard.on_trigger_without_tools(&ctx) {
            info!(
                invocation_id = %ctx.invocation_id,
                "Research deferred until tools are ready"
            );
            return Ok(PipelineOutcome::Retry { notice, plan });
        }

        // The guard is ready; the hand-off to the stage may still be in flight
        let tools = self
            .research
            .tools()
            .or_else(|| self.guard.tools())
            .ok_or_else(|| ScoutError::agent("Tools reported ready but none were published"))?;

        info!(
            stage = RESEARCHER.name,
            tools = tools.len(),
            "Researching"
        );
        let findings = self
            .research
            .run(
                self.provider.as_ref(),
                &tools,
                topic,
                &plan,
                self.options.max_tool_steps,
                &mut usage,
            )
            .await
            .map_err(|e| stage_error(Stage::Researcher, e))?;

        info!(stage = PUBLISHER.name, "Publishing report");
        let messages = [
            LlmMessage::system(PUBLISHER.instruction),
            LlmMessage::user(publisher_input(topic, &findings.text)),
        ];
        let response = self
            .provider
            .chat(&messages, &[])
            .await
            .map_err(|e| stage_error(Stage::Publisher, e))?;
        if let Some(u) = &response.usage {
            usage.add(u);
        }

        Ok(PipelineOutcome::Completed(Box::new(PipelineRun {
            id: Uuid::new_v4(),
            topic: topic.to_string(),
            plan,
            findings,
            report: response.content,
            usage,
            started_at,
            finished_at: Utc::now(),
        })))
    }
}

fn validate_topic(topic: &str) -> ScoutResult<&str> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(ScoutError::invalid_input_field(
            "Research topic cannot be empty",
            "topic",
        ));
    }
    Ok(topic)
}

/// Stage failures surface as LLM errors tagged with the stage
fn stage_error(stage: Stage, error: ScoutError) -> ScoutError {
    let context = format!("{} stage", stage.spec().name);
    match error {
        ScoutError::Llm { .. } => error.with_context(context),
        other => ScoutError::Llm {
            message: other.to_string(),
            provider: None,
            context: Some(context),
        },
    }
}
