//! Fakes shared by the unit tests

use crate::error::{ScoutError, ScoutResult};
use crate::tools::{ProviderCloser, Tool, ToolCall, ToolError, ToolProvider, ToolResult, ToolSchema, ToolSet};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;

/// Tool that records its calls and answers with a fixed output
pub struct StubTool {
    pub name: &'static str,
    pub output: &'static str,
    pub calls: parking_lot::Mutex<Vec<ToolCall>>,
}

impl StubTool {
    pub fn new(name: &'static str, output: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            output,
            calls: parking_lot::Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Tool for StubTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "stub tool"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name,
            "stub tool",
            json!({"type": "object", "properties": {"query": {"type": "string"}}}),
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        self.calls.lock().push(call.clone());
        Ok(ToolResult::success(&call.id, self.name, self.output))
    }
}

struct CountingCloser {
    closes: Arc<AtomicUsize>,
    fail: bool,
}

#[async_trait]
impl ProviderCloser for CountingCloser {
    async fn close(&self) -> ScoutResult<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ScoutError::close("server already gone"));
        }
        Ok(())
    }
}

/// Provider that counts connects and closes, can fail its first connects
/// and can hold every connect until the test releases it.
pub struct FakeProvider {
    connects: AtomicUsize,
    closes: Arc<AtomicUsize>,
    failures_left: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
    failing_close: bool,
    tools: Vec<Arc<dyn Tool>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            connects: AtomicUsize::new(0),
            closes: Arc::new(AtomicUsize::new(0)),
            failures_left: AtomicUsize::new(0),
            gate: None,
            failing_close: false,
            tools: vec![
                StubTool::new("search_engine", "search results") as Arc<dyn Tool>,
                StubTool::new("scrape_as_markdown", "# page") as Arc<dyn Tool>,
            ],
        }
    }

    pub fn with_tools(mut self, tools: Vec<Arc<dyn Tool>>) -> Self {
        self.tools = tools;
        self
    }

    pub fn failing_first(self, failures: usize) -> Self {
        self.failures_left.store(failures, Ordering::SeqCst);
        self
    }

    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn with_failing_close(mut self) -> Self {
        self.failing_close = true;
        self
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn connect(&self) -> ScoutResult<(ToolSet, Box<dyn ProviderCloser>)> {
        self.connects.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| ScoutError::connection(e.to_string()))?;
            permit.forget();
        }

        let should_fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(ScoutError::connection("spawn npx: No such file or directory"));
        }

        let closer = CountingCloser {
            closes: Arc::clone(&self.closes),
            fail: self.failing_close,
        };
        Ok((ToolSet::new(self.tools.iter().cloned()), Box::new(closer)))
    }
}
