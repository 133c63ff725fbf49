//! Once-only initialization of the tool provider connection

use super::policy::InitPolicy;
use super::state::{InitializationState, RetryNotice, TriggerContext};
use crate::error::{ScoutError, ScoutResult};
use crate::tools::{ProviderCloser, ToolProvider, ToolSet};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// An in-flight connection attempt that any number of callers can await
type Attempt = Shared<BoxFuture<'static, ScoutResult<ToolSet>>>;

/// Receives the tool set once the guard becomes ready
pub trait ToolConsumer: Send + Sync {
    fn attach_tools(&self, tools: ToolSet);
}

enum Slot {
    Uninitialized,
    InProgress(Attempt),
    Ready(ToolSet),
    Failed(Failure),
}

struct Failure {
    error: ScoutError,
    at: Instant,
    consecutive: u32,
}

enum Claim {
    Ready(ToolSet),
    Started(Attempt),
    Joined(Attempt),
    Refused(ScoutError),
}

struct Inner {
    provider: Arc<dyn ToolProvider>,
    policy: InitPolicy,
    /// Set once, on the transition to `Ready`
    ready: OnceLock<ToolSet>,
    slot: parking_lot::Mutex<Slot>,
    /// Written only while `slot` is locked
    closed: AtomicBool,
    closer: parking_lot::Mutex<Option<Box<dyn ProviderCloser>>>,
    consumers: parking_lot::Mutex<Vec<Arc<dyn ToolConsumer>>>,
    attempts: AtomicU32,
}

/// Connects to the tool provider at most once at a time and publishes the
/// resulting [`ToolSet`].
///
/// Cloning the guard yields another handle to the same state. Readiness is
/// checked without locking; the lock only serialises the decision to start
/// an attempt, never the connection I/O. Each attempt runs as its own Tokio
/// task and finishes even if every caller waiting on it goes away.
#[derive(Clone)]
pub struct InitializationGuard {
    inner: Arc<Inner>,
}

impl InitializationGuard {
    pub fn new(provider: Arc<dyn ToolProvider>, policy: InitPolicy) -> Self {
        Self {
            inner: Arc::new(Inner {
                provider,
                policy,
                ready: OnceLock::new(),
                slot: parking_lot::Mutex::new(Slot::Uninitialized),
                closed: AtomicBool::new(false),
                closer: parking_lot::Mutex::new(None),
                consumers: parking_lot::Mutex::new(Vec::new()),
                attempts: AtomicU32::new(0),
            }),
        }
    }

    pub fn policy(&self) -> &InitPolicy {
        &self.inner.policy
    }

    /// False again once the guard is closed
    pub fn is_ready(&self) -> bool {
        self.inner.live_tools().is_some()
    }

    /// The published tool set, if ready and not closed
    pub fn tools(&self) -> Option<ToolSet> {
        self.inner.live_tools().cloned()
    }

    pub fn state(&self) -> InitializationState {
        match &*self.inner.slot.lock() {
            Slot::Uninitialized => InitializationState::Uninitialized,
            Slot::InProgress(_) => InitializationState::InProgress,
            Slot::Ready(_) => InitializationState::Ready,
            Slot::Failed(_) => InitializationState::Failed,
        }
    }

    /// Number of connection attempts started so far
    pub fn attempts(&self) -> u32 {
        self.inner.attempts.load(Ordering::SeqCst)
    }

    /// Return the tool set, connecting first if needed.
    ///
    /// Joins the in-flight attempt when one is running. After a failure a
    /// new attempt starts only when the retry policy allows it; otherwise
    /// the stored failure is returned without any I/O.
    #[instrument(skip(self), level = "debug")]
    pub async fn ensure_initialized(&self) -> ScoutResult<ToolSet> {
        match self.inner.claim() {
            Claim::Ready(tools) => Ok(tools),
            Claim::Started(attempt) | Claim::Joined(attempt) => attempt.await,
            Claim::Refused(error) => Err(error),
        }
    }

    /// Hand the tool set to `consumer` exactly once: now if ready, otherwise
    /// when the guard becomes ready.
    pub fn notify_ready(&self, consumer: Arc<dyn ToolConsumer>) {
        let tools = {
            let mut consumers = self.inner.consumers.lock();
            if self.inner.closed.load(Ordering::Acquire) {
                return;
            }
            match self.inner.ready.get() {
                Some(tools) => tools.clone(),
                None => {
                    consumers.push(consumer);
                    return;
                }
            }
        };
        consumer.attach_tools(tools);
    }

    /// Called when an agent needs tools that may not exist yet.
    ///
    /// Returns `None` when ready. Otherwise starts initialization in the
    /// background if allowed and returns a notice asking the caller to retry.
    /// Never waits and never fails.
    pub fn on_trigger_without_tools(&self, ctx: &TriggerContext) -> Option<RetryNotice> {
        match self.inner.claim() {
            Claim::Ready(_) => return None,
            Claim::Started(_) => info!(
                agent = %ctx.agent_name,
                invocation_id = %ctx.invocation_id,
                "Tools not ready, started background initialization"
            ),
            Claim::Joined(_) => debug!(
                agent = %ctx.agent_name,
                invocation_id = %ctx.invocation_id,
                "Tools not ready, initialization already in progress"
            ),
            Claim::Refused(error) => warn!(
                agent = %ctx.agent_name,
                invocation_id = %ctx.invocation_id,
                error = %error,
                "Tools not ready, initialization not started"
            ),
        }
        Some(RetryNotice::for_trigger(ctx))
    }

    /// Forget past failures so the next call may connect again
    pub fn reset(&self) {
        let mut slot = self.inner.slot.lock();
        if matches!(*slot, Slot::Failed(_)) {
            info!("Clearing tool initialization failure history");
            *slot = Slot::Uninitialized;
        }
    }

    /// Whether a connection is open and not yet closed
    pub fn has_open_connection(&self) -> bool {
        self.inner.closer.lock().is_some()
    }

    /// Close the provider connection if one was opened.
    ///
    /// Only the first call does anything. Close errors are logged, not
    /// returned. No new attempt starts afterwards, and an attempt still
    /// connecting closes its own connection when it finishes. A ready guard
    /// stops handing out its tool set.
    pub async fn close(&self) {
        let closer = {
            let mut slot = self.inner.slot.lock();
            self.inner.closed.store(true, Ordering::Release);
            if matches!(*slot, Slot::Ready(_)) {
                *slot = Slot::Failed(Failure {
                    error: ScoutError::Cancelled,
                    at: Instant::now(),
                    consecutive: 0,
                });
            }
            self.inner.closer.lock().take()
        };

        match closer {
            Some(closer) => match closer.close().await {
                Ok(()) => info!(provider = self.inner.provider.name(), "Tool provider closed"),
                Err(e) => warn!(
                    provider = self.inner.provider.name(),
                    error = %e,
                    "Failed to close tool provider"
                ),
            },
            None => debug!("No tool provider connection to close"),
        }
    }
}

impl fmt::Debug for InitializationGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitializationGuard")
            .field("provider", &self.inner.provider.name())
            .field("state", &self.state())
            .field("attempts", &self.attempts())
            .finish()
    }
}

impl Inner {
    fn live_tools(&self) -> Option<&ToolSet> {
        if self.closed.load(Ordering::Acquire) {
            return None;
        }
        self.ready.get()
    }

    fn claim(self: &Arc<Self>) -> Claim {
        if let Some(tools) = self.live_tools() {
            return Claim::Ready(tools.clone());
        }

        let mut slot = self.slot.lock();
        if self.closed.load(Ordering::Acquire) {
            return Claim::Refused(ScoutError::Cancelled);
        }
        let prior_failures = match &*slot {
            Slot::Ready(tools) => return Claim::Ready(tools.clone()),
            Slot::InProgress(attempt) => return Claim::Joined(attempt.clone()),
            Slot::Uninitialized => 0,
            Slot::Failed(failure) => {
                if !self.policy.allows_attempt(failure.consecutive) {
                    return Claim::Refused(ScoutError::init_exhausted(
                        failure.consecutive,
                        failure.error.to_string(),
                    ));
                }
                if failure.at.elapsed() < self.policy.backoff_after(failure.consecutive) {
                    return Claim::Refused(failure.error.clone());
                }
                failure.consecutive
            }
        };

        match self.spawn_attempt(prior_failures) {
            Ok(attempt) => {
                *slot = Slot::InProgress(attempt.clone());
                Claim::Started(attempt)
            }
            Err(error) => Claim::Refused(error),
        }
    }

    fn spawn_attempt(self: &Arc<Self>, prior_failures: u32) -> ScoutResult<Attempt> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            ScoutError::connection_with_context(
                "No async runtime available for tool initialization",
                e.to_string(),
            )
        })?;

        let number = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let task = runtime.spawn(Arc::clone(self).run_attempt(number, prior_failures));

        let inner = Arc::clone(self);
        Ok(async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    let error = ScoutError::connection_with_context(
                        "Initialization task did not finish",
                        e.to_string(),
                    );
                    inner.record_failure(number, prior_failures + 1, &error);
                    Err(error)
                }
            }
        }
        .boxed()
        .shared())
    }

    async fn run_attempt(self: Arc<Self>, number: u32, prior_failures: u32) -> ScoutResult<ToolSet> {
        info!(
            attempt = number,
            provider = self.provider.name(),
            "Connecting to tool provider"
        );

        let outcome = match AssertUnwindSafe(self.provider.connect()).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(_) => Err(ScoutError::connection("Tool provider panicked while connecting")),
        };

        match outcome {
            Ok((tools, closer)) => self.publish(number, prior_failures, tools, closer).await,
            Err(error) => {
                self.record_failure(number, prior_failures + 1, &error);
                Err(error)
            }
        }
    }

    async fn publish(
        &self,
        number: u32,
        prior_failures: u32,
        tools: ToolSet,
        closer: Box<dyn ProviderCloser>,
    ) -> ScoutResult<ToolSet> {
        {
            let mut slot = self.slot.lock();
            if !self.closed.load(Ordering::Acquire) {
                *self.closer.lock() = Some(closer);
                // Only this path sets it, and only once
                let _ = self.ready.set(tools.clone());
                *slot = Slot::Ready(tools.clone());
                drop(slot);

                info!(
                    attempt = number,
                    tools = tools.len(),
                    "Tool provider ready"
                );
                self.deliver(&tools);
                return Ok(tools);
            }
            *slot = Slot::Failed(Failure {
                error: ScoutError::Cancelled,
                at: Instant::now(),
                consecutive: prior_failures,
            });
        }

        warn!(attempt = number, "Guard closed while connecting, closing the new connection");
        if let Err(e) = closer.close().await {
            warn!(error = %e, "Failed to close tool provider");
        }
        Err(ScoutError::Cancelled)
    }

    fn record_failure(&self, number: u32, consecutive: u32, error: &ScoutError) {
        warn!(
            attempt = number,
            consecutive_failures = consecutive,
            error = %error,
            "Tool provider connection failed"
        );

        let mut slot = self.slot.lock();
        if matches!(*slot, Slot::InProgress(_)) {
            *slot = Slot::Failed(Failure {
                error: error.clone(),
                at: Instant::now(),
                consecutive,
            });
        }
    }

    fn deliver(&self, tools: &ToolSet) {
        let consumers = std::mem::take(&mut *self.consumers.lock());
        for consumer in consumers {
            consumer.attach_tools(tools.clone());
        }
    }
}
