//! End-to-end initialization scenarios through the public API

use async_trait::async_trait;
use futures::future::join_all;
use scout::core::llm::{LlmMessage, LlmProvider, LlmResponse};
use scout::core::pipeline::PipelineOptions;
use scout::core::tools::{
    ProviderCloser, Tool, ToolCall, ToolError, ToolProvider, ToolResult, ToolSchema,
};
use scout::{
    AgentPipeline, ExitHook, InitPolicy, InitializationGuard, InitializationState,
    PipelineOutcome, ScoutError, ScoutResult, ToolSet, TriggerContext,
};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

struct NamedTool(&'static str);

#[async_trait]
impl Tool for NamedTool {
    fn name(&self) -> &str {
        self.0
    }

    fn description(&self) -> &str {
        "Web tool"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(self.0, "Web tool", json!({"type": "object", "properties": {}}))
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        Ok(ToolResult::success(&call.id, self.0, "ok"))
    }
}

struct CountingCloser(Arc<AtomicUsize>);

#[async_trait]
impl ProviderCloser for CountingCloser {
    async fn close(&self) -> ScoutResult<()> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Web tool server stand-in: slow to start, optionally failing first
struct WebTools {
    fail_first: usize,
    delay: Duration,
    connects: AtomicUsize,
    closes: Arc<AtomicUsize>,
}

impl WebTools {
    fn new(fail_first: usize, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            fail_first,
            delay,
            connects: AtomicUsize::new(0),
            closes: Arc::new(AtomicUsize::new(0)),
        })
    }
}

#[async_trait]
impl ToolProvider for WebTools {
    fn name(&self) -> &str {
        "web-tools"
    }

    async fn connect(&self) -> ScoutResult<(ToolSet, Box<dyn ProviderCloser>)> {
        let attempt = self.connects.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if attempt < self.fail_first {
            return Err(ScoutError::connection("tool server exited during startup"));
        }
        let tools = ToolSet::new([
            Arc::new(NamedTool("search_engine")) as Arc<dyn Tool>,
            Arc::new(NamedTool("scrape_as_markdown")) as Arc<dyn Tool>,
        ]);
        Ok((tools, Box::new(CountingCloser(Arc::clone(&self.closes)))))
    }
}

struct PlainLlm;

#[async_trait]
impl LlmProvider for PlainLlm {
    async fn chat(&self, _messages: &[LlmMessage], _tools: &[ToolSchema]) -> ScoutResult<LlmResponse> {
        Ok(LlmResponse::text("done"))
    }
}

fn guard(tools: &Arc<WebTools>) -> InitializationGuard {
    InitializationGuard::new(Arc::clone(tools) as Arc<dyn ToolProvider>, InitPolicy::immediate())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_two_early_triggers_then_tools_arrive() {
    let tools = WebTools::new(0, Duration::from_millis(50));
    let guard = guard(&tools);

    let notices = join_all((0..2).map(|_| {
        let guard = guard.clone();
        async move { guard.on_trigger_without_tools(&TriggerContext::new("researcher")) }
    }))
    .await;
    assert!(notices.iter().all(Option::is_some));
    assert_eq!(guard.state(), InitializationState::InProgress);

    while !guard.is_ready() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    assert!(guard.on_trigger_without_tools(&TriggerContext::new("researcher")).is_none());
    let set = guard.tools().expect("ready guard has tools");
    assert!(set.get("search_engine").is_some());
    assert_eq!(tools.connects.load(Ordering::SeqCst), 1);

    ExitHook::register(&guard).run().await;
    assert_eq!(tools.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_connect_then_success() {
    let tools = WebTools::new(1, Duration::ZERO);
    let guard = guard(&tools);

    let err = guard.ensure_initialized().await.unwrap_err();
    assert!(matches!(err, ScoutError::Connection { .. }));
    assert_eq!(guard.state(), InitializationState::Failed);

    // No close for a connection that never opened
    assert!(!guard.has_open_connection());

    let set = guard.ensure_initialized().await.unwrap();
    assert_eq!(guard.state(), InitializationState::Ready);
    assert_eq!(set.names(), vec!["search_engine", "scrape_as_markdown"]);
    assert_eq!(tools.connects.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_pipeline_retries_then_completes() {
    let tools = WebTools::new(0, Duration::from_millis(20));
    let guard = guard(&tools);
    let hook = ExitHook::register(&guard);
    let pipeline = AgentPipeline::new(Arc::new(PlainLlm), guard.clone(), PipelineOptions::default());

    let PipelineOutcome::Retry { notice, plan } = pipeline.run("rust mcp clients").await.unwrap() else {
        panic!("tools cannot be ready before the first trigger");
    };
    assert_eq!(notice.agent_name, "researcher");

    guard.ensure_initialized().await.unwrap();
    let outcome = pipeline.resume("rust mcp clients", plan).await.unwrap();
    let PipelineOutcome::Completed(run) = outcome else {
        panic!("tools were ready");
    };
    assert_eq!(run.report, "done");
    assert_eq!(
        pipeline.research_stage().tool_names(),
        vec!["search_engine", "scrape_as_markdown"]
    );

    drop(hook);
    assert_eq!(tools.closes.load(Ordering::SeqCst), 1);
}
