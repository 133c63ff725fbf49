//! Research command: drive the pipeline until the report is published

use super::build_guard;
use crate::console::CLIConsole;
use crate::signal_handler::SignalHandler;
use anyhow::{Context, Result, bail};
use scout_core::config::Config;
use scout_core::error::{ScoutError, ScoutResult};
use scout_core::guard::{ExitHook, InitializationGuard, RetryNotice};
use scout_core::llm::GoogleProvider;
use scout_core::pipeline::{AgentPipeline, PipelineOutcome, PipelineRun};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

/// How long to keep retrying while tools initialize
#[derive(Debug, Clone)]
pub struct TurnOptions {
    pub max_turns: u32,
    pub retry_wait: Duration,
}

/// Arguments for the research command
#[derive(Debug, Clone)]
pub struct ResearchArgs {
    pub topic: String,
    pub output: Option<PathBuf>,
    pub turns: TurnOptions,
    pub verbose: bool,
}

/// How a driven run ended
#[derive(Debug)]
pub enum DriveOutcome {
    Completed(Box<PipelineRun>),
    /// Tools never became ready within the turn budget
    GaveUp { turns: u32, notice: RetryNotice },
    Interrupted,
}

pub async fn execute(args: ResearchArgs, config: Config, signals: &SignalHandler) -> Result<()> {
    let console = CLIConsole::new(args.verbose);
    let llm = Arc::new(GoogleProvider::new(&config.model)?);
    let guard = build_guard(&config);
    let hook = ExitHook::register(&guard);
    let pipeline = AgentPipeline::new(llm, guard, config.pipeline.clone());

    console.status(&format!("Researching \"{}\"", args.topic.trim()));
    let outcome = drive(&pipeline, &args.topic, &args.turns, signals.wait()).await;
    hook.run().await;

    match outcome? {
        DriveOutcome::Completed(run) => {
            console.info(&format!(
                "{} tool calls, {} tokens",
                run.findings.tool_calls.len(),
                run.usage.total_tokens
            ));
            write_report(&run, args.output.as_ref(), &console).await
        }
        DriveOutcome::GaveUp { turns, notice } => {
            console.warn(&notice.message);
            bail!("Tools were still not ready after {} turns", turns)
        }
        DriveOutcome::Interrupted => {
            console.warn("Interrupted");
            bail!("Research interrupted before the report was published")
        }
    }
}

/// Run turns until the report is published, the turn budget is spent or
/// `shutdown` resolves. Later turns reuse the first turn's plan.
pub async fn drive<S>(
    pipeline: &AgentPipeline,
    topic: &str,
    turns: &TurnOptions,
    shutdown: S,
) -> ScoutResult<DriveOutcome>
where
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut plan: Option<String> = None;
    let mut turn = 0;

    loop {
        turn += 1;
        let outcome = tokio::select! {
            _ = &mut shutdown => return Ok(DriveOutcome::Interrupted),
            outcome = next_turn(pipeline, topic, plan.take()) => outcome?,
        };

        let notice = match outcome {
            PipelineOutcome::Completed(run) => return Ok(DriveOutcome::Completed(run)),
            PipelineOutcome::Retry { notice, plan: turn_plan } => {
                plan = Some(turn_plan);
                notice
            }
        };
        info!(
            turn,
            max_turns = turns.max_turns,
            invocation_id = %notice.invocation_id,
            "{}",
            notice.message
        );
        if turn >= turns.max_turns {
            return Ok(DriveOutcome::GaveUp { turns: turn, notice });
        }

        tokio::select! {
            _ = &mut shutdown => return Ok(DriveOutcome::Interrupted),
            waited = wait_for_tools(pipeline.guard(), turns.retry_wait) => waited?,
        }
    }
}

async fn next_turn(
    pipeline: &AgentPipeline,
    topic: &str,
    plan: Option<String>,
) -> ScoutResult<PipelineOutcome> {
    match plan {
        Some(plan) => pipeline.resume(topic, plan).await,
        None => pipeline.run(topic).await,
    }
}

/// Wait up to `wait` for the in-flight attempt. Only an exhausted guard
/// ends the run; other failures wait out the rest of the window.
async fn wait_for_tools(guard: &InitializationGuard, wait: Duration) -> ScoutResult<()> {
    let deadline = Instant::now() + wait;
    match tokio::time::timeout(wait, guard.ensure_initialized()).await {
        Ok(Ok(_)) | Err(_) => Ok(()),
        Ok(Err(error @ ScoutError::InitExhausted { .. })) => Err(error),
        Ok(Err(error)) => {
            warn!(error = %error, "Tool initialization failed, will retry");
            tokio::time::sleep_until(deadline).await;
            Ok(())
        }
    }
}

/// Report with a generated header
pub fn render_report(run: &PipelineRun) -> String {
    format!(
        "# {}\n\n_Generated by scout on {}_\n\n{}\n",
        run.topic,
        run.finished_at.format("%Y-%m-%d %H:%M:%S UTC"),
        run.report.trim()
    )
}

async fn write_report(
    run: &PipelineRun,
    output: Option<&PathBuf>,
    console: &CLIConsole,
) -> Result<()> {
    let report = render_report(run);
    match output {
        Some(path) => {
            tokio::fs::write(path, &report)
                .await
                .with_context(|| format!("Writing report to {}", path.display()))?;
            console.success(&format!("Report written to {}", path.display()));
        }
        None => print!("{}", report),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use scout_core::guard::InitPolicy;
    use scout_core::llm::{LlmMessage, LlmProvider, LlmResponse};
    use scout_core::pipeline::PipelineOptions;
    use scout_core::pipeline::prompts::PLANNER;
    use scout_core::tools::{ProviderCloser, ToolProvider, ToolSchema, ToolSet};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct ScriptedLlm {
        planner_calls: AtomicUsize,
    }

    #[async_trait]
    impl LlmProvider for ScriptedLlm {
        async fn chat(
            &self,
            messages: &[LlmMessage],
            _tools: &[ToolSchema],
        ) -> ScoutResult<LlmResponse> {
            if messages[0].content == PLANNER.instruction {
                self.planner_calls.fetch_add(1, Ordering::SeqCst);
                return Ok(LlmResponse::text("1. search"));
            }
            Ok(LlmResponse::text("report body"))
        }
    }

    enum Connect {
        After(Duration),
        Never,
        Fail,
    }

    struct SlowTools {
        connect: Connect,
        closes: Arc<AtomicUsize>,
    }

    impl SlowTools {
        fn new(connect: Connect) -> Arc<Self> {
            Arc::new(Self {
                connect,
                closes: Arc::new(AtomicUsize::new(0)),
            })
        }
    }

    struct Closer(Arc<AtomicUsize>);

    #[async_trait]
    impl ProviderCloser for Closer {
        async fn close(&self) -> ScoutResult<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[async_trait]
    impl ToolProvider for SlowTools {
        fn name(&self) -> &str {
            "slow"
        }

        async fn connect(&self) -> ScoutResult<(ToolSet, Box<dyn ProviderCloser>)> {
            match self.connect {
                Connect::After(delay) => tokio::time::sleep(delay).await,
                Connect::Never => std::future::pending::<()>().await,
                Connect::Fail => return Err(ScoutError::connection("refused")),
            }
            Ok((ToolSet::empty(), Box::new(Closer(Arc::clone(&self.closes)))))
        }
    }

    fn pipeline(
        tools: &Arc<SlowTools>,
        policy: InitPolicy,
    ) -> (AgentPipeline, Arc<ScriptedLlm>) {
        let llm = Arc::new(ScriptedLlm::default());
        let guard = InitializationGuard::new(Arc::clone(tools) as Arc<dyn ToolProvider>, policy);
        let pipeline = AgentPipeline::new(llm.clone(), guard, PipelineOptions::default());
        (pipeline, llm)
    }

    fn turns(max_turns: u32, retry_wait: Duration) -> TurnOptions {
        TurnOptions {
            max_turns,
            retry_wait,
        }
    }

    #[tokio::test]
    async fn test_completes_once_tools_are_ready() {
        let tools = SlowTools::new(Connect::After(Duration::from_millis(30)));
        let (pipeline, llm) = pipeline(&tools, InitPolicy::immediate());

        let outcome = drive(
            &pipeline,
            "rust mcp clients",
            &turns(3, Duration::from_secs(5)),
            std::future::pending::<()>(),
        )
        .await
        .unwrap();

        let DriveOutcome::Completed(run) = outcome else {
            panic!("expected a completed run, got {outcome:?}");
        };
        assert_eq!(run.plan, "1. search");
        assert_eq!(run.report, "report body");
        assert_eq!(llm.planner_calls.load(Ordering::SeqCst), 1);

        ExitHook::register(pipeline.guard()).run().await;
        assert_eq!(tools.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_turns() {
        let tools = SlowTools::new(Connect::Never);
        let (pipeline, llm) = pipeline(&tools, InitPolicy::immediate());

        let outcome = drive(
            &pipeline,
            "topic",
            &turns(2, Duration::from_millis(10)),
            std::future::pending::<()>(),
        )
        .await
        .unwrap();

        match outcome {
            DriveOutcome::GaveUp { turns, notice } => {
                assert_eq!(turns, 2);
                assert_eq!(notice.agent_name, "researcher");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(llm.planner_calls.load(Ordering::SeqCst), 1);
        assert_eq!(pipeline.guard().attempts(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_waiting() {
        let tools = SlowTools::new(Connect::Never);
        let (pipeline, _) = pipeline(&tools, InitPolicy::immediate());

        let outcome = drive(
            &pipeline,
            "topic",
            &turns(10, Duration::from_secs(60)),
            async {},
        )
        .await
        .unwrap();
        assert!(matches!(outcome, DriveOutcome::Interrupted));

        ExitHook::register(pipeline.guard()).run().await;
        assert_eq!(tools.closes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_exhausted_guard_ends_run() {
        let tools = SlowTools::new(Connect::Fail);
        let (pipeline, _) = pipeline(&tools, InitPolicy::immediate().with_max_attempts(1));

        let err = drive(
            &pipeline,
            "topic",
            &turns(5, Duration::from_millis(10)),
            std::future::pending::<()>(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ScoutError::InitExhausted { attempts: 1, .. }));
    }

    #[tokio::test]
    async fn test_report_header() {
        let tools = SlowTools::new(Connect::After(Duration::ZERO));
        let (pipeline, _) = pipeline(&tools, InitPolicy::immediate());
        pipeline.guard().ensure_initialized().await.unwrap();

        let PipelineOutcome::Completed(run) = pipeline.run("Rust MCP clients").await.unwrap() else {
            panic!("tools were ready");
        };
        let report = render_report(&run);
        assert!(report.starts_with("# Rust MCP clients\n\n_Generated by scout on "));
        assert!(report.ends_with("report body\n"));
    }

    #[tokio::test]
    async fn test_report_written_to_file() {
        let tools = SlowTools::new(Connect::After(Duration::ZERO));
        let (pipeline, _) = pipeline(&tools, InitPolicy::immediate());
        pipeline.guard().ensure_initialized().await.unwrap();
        let PipelineOutcome::Completed(run) = pipeline.run("topic").await.unwrap() else {
            panic!("tools were ready");
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        write_report(&run, Some(&path), &CLIConsole::new(false))
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), render_report(&run));
    }
}
