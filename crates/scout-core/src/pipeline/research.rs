//! The research stage: the only consumer of the tool set

use super::prompts::{RESEARCHER, WRAP_UP_PROMPT, researcher_input};
use super::run::{Findings, ToolCallRecord};
use crate::error::ScoutResult;
use crate::guard::ToolConsumer;
use crate::llm::{LlmMessage, LlmProvider, LlmUsage};
use crate::tools::{ToolCall, ToolResult, ToolSet};
use tracing::{debug, info, warn};

/// Holds the tool set handed over by the guard and runs the tool loop
#[derive(Debug, Default)]
pub struct ResearchStage {
    tools: parking_lot::RwLock<Option<ToolSet>>,
}

impl ResearchStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// The attached tool set, if any
    pub fn tools(&self) -> Option<ToolSet> {
        self.tools.read().clone()
    }

    /// Names of the attached tools, empty before attachment
    pub fn tool_names(&self) -> Vec<String> {
        self.tools
            .read()
            .as_ref()
            .map(ToolSet::names)
            .unwrap_or_default()
    }

    /// Run the tool loop until the model answers without tool calls or
    /// `max_tool_steps` turns have been spent.
    pub(crate) async fn run(
        &self,
        provider: &dyn LlmProvider,
        tools: &ToolSet,
        topic: &str,
        plan: &str,
        max_tool_steps: u32,
        usage: &mut LlmUsage,
    ) -> ScoutResult<Findings> {
        let schemas = tools.schemas();
        let mut messages = vec![
            LlmMessage::system(RESEARCHER.instruction),
            LlmMessage::user(researcher_input(topic, plan)),
        ];
        let mut findings = Findings::default();

        while findings.steps < max_tool_steps {
            findings.steps += 1;
            let response = provider.chat(&messages, &schemas).await?;
            if let Some(u) = &response.usage {
                usage.add(u);
            }

            if !response.has_tool_calls() {
                findings.text = response.content;
                return Ok(findings);
            }

            debug!(
                step = findings.steps,
                calls = response.tool_calls.len(),
                "Researcher requested tools"
            );
            messages.push(LlmMessage::assistant_with_tools(
                response.content,
                response.tool_calls.clone(),
            ));

            for call in &response.tool_calls {
                let result = execute(tools, call).await;
                findings.tool_calls.push(ToolCallRecord {
                    tool_name: call.name.clone(),
                    success: result.success,
                    execution_time_ms: result.execution_time_ms,
                });
                messages.push(LlmMessage::tool(result.content(), &call.id, &call.name));
            }
        }

        warn!(max_tool_steps, "Researcher used its tool budget, asking for a summary");
        findings.budget_exhausted = true;
        findings.steps += 1;
        messages.push(LlmMessage::user(WRAP_UP_PROMPT));
        let response = provider.chat(&messages, &[]).await?;
        if let Some(u) = &response.usage {
            usage.add(u);
        }
        findings.text = response.content;
        Ok(findings)
    }
}

async fn execute(tools: &ToolSet, call: &ToolCall) -> ToolResult {
    match tools.get(&call.name) {
        Some(tool) => {
            let result = tool.execute_with_timing(call).await;
            info!(
                tool_name = %call.name,
                success = result.success,
                elapsed_ms = result.execution_time_ms.unwrap_or_default(),
                "Tool call finished"
            );
            result
        }
        None => {
            warn!(tool_name = %call.name, "Model requested an unknown tool");
            ToolResult::error(
                &call.id,
                &call.name,
                format!(
                    "Unknown tool '{}'. Available tools: {}",
                    call.name,
                    tools.names().join(", ")
                ),
            )
        }
    }
}

impl ToolConsumer for ResearchStage {
    fn attach_tools(&self, tools: ToolSet) {
        let mut slot = self.tools.write();
        if slot.is_some() {
            warn!("Research stage already has tools, ignoring second hand-off");
            return;
        }
        info!(tools = ?tools.names(), "Research stage received tools");
        *slot = Some(tools);
    }
}
