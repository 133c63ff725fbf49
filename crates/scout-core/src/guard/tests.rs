//! Tests for the initialization guard and exit hook

use super::*;
use crate::error::ScoutError;
use crate::test_support::FakeProvider;
use crate::tools::{ToolProvider, ToolSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_test::{assert_pending, assert_ready};

#[derive(Default)]
struct RecordingConsumer {
    received: parking_lot::Mutex<Vec<ToolSet>>,
}

impl ToolConsumer for RecordingConsumer {
    fn attach_tools(&self, tools: ToolSet) {
        self.received.lock().push(tools);
    }
}

fn guard_for(provider: &Arc<FakeProvider>, policy: InitPolicy) -> InitializationGuard {
    InitializationGuard::new(Arc::clone(provider) as Arc<dyn ToolProvider>, policy)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_share_one_connect() {
    let gate = Arc::new(Semaphore::new(0));
    let provider = Arc::new(FakeProvider::new().gated(Arc::clone(&gate)));
    let guard = guard_for(&provider, InitPolicy::immediate());

    let callers: Vec<_> = (0..16)
        .map(|_| {
            let guard = guard.clone();
            tokio::spawn(async move { guard.ensure_initialized().await })
        })
        .collect();

    while provider.connects() == 0 {
        tokio::task::yield_now().await;
    }
    assert_eq!(guard.state(), InitializationState::InProgress);
    gate.add_permits(1);

    let mut sets = Vec::new();
    for caller in callers {
        sets.push(caller.await.unwrap().unwrap());
    }

    assert_eq!(provider.connects(), 1);
    assert_eq!(guard.attempts(), 1);
    assert!(sets.iter().all(|s| s.ptr_eq(&sets[0])));
}

#[tokio::test]
async fn test_ready_returns_identical_set_without_io() {
    let provider = Arc::new(FakeProvider::new());
    let guard = guard_for(&provider, InitPolicy::default());

    let first = guard.ensure_initialized().await.unwrap();
    let second = guard.ensure_initialized().await.unwrap();

    assert!(first.ptr_eq(&second));
    assert!(guard.tools().unwrap().ptr_eq(&first));
    assert_eq!(guard.state(), InitializationState::Ready);
    assert_eq!(provider.connects(), 1);
    assert!(guard.on_trigger_without_tools(&TriggerContext::new("researcher")).is_none());
    assert_eq!(provider.connects(), 1);
}

#[tokio::test]
async fn test_failure_then_exactly_one_new_attempt() {
    let provider = Arc::new(FakeProvider::new().failing_first(1));
    let guard = guard_for(&provider, InitPolicy::immediate());

    let err = guard.ensure_initialized().await.unwrap_err();
    assert!(matches!(err, ScoutError::Connection { .. }));
    assert_eq!(guard.state(), InitializationState::Failed);
    assert!(guard.tools().is_none());

    let tools = guard.ensure_initialized().await.unwrap();
    assert_eq!(tools.names(), vec!["search_engine", "scrape_as_markdown"]);
    assert_eq!(provider.connects(), 2);
    assert_eq!(guard.attempts(), 2);
}

#[tokio::test]
async fn test_trigger_returns_before_connect_completes() {
    let gate = Arc::new(Semaphore::new(0));
    let provider = Arc::new(FakeProvider::new().gated(Arc::clone(&gate)));
    let guard = guard_for(&provider, InitPolicy::immediate());

    let notice = guard
        .on_trigger_without_tools(&TriggerContext::new("researcher"))
        .expect("tools are not ready");
    assert_eq!(notice.message, RETRY_MESSAGE);
    assert_eq!(notice.agent_name, "researcher");
    assert_eq!(guard.state(), InitializationState::InProgress);

    // A retry while in progress reports not-ready without a second attempt
    assert!(guard.on_trigger_without_tools(&TriggerContext::new("researcher")).is_some());
    assert_eq!(guard.attempts(), 1);

    let mut waiter = tokio_test::task::spawn(guard.ensure_initialized());
    assert_pending!(waiter.poll());

    gate.add_permits(1);
    let tools = guard.ensure_initialized().await.unwrap();
    assert!(waiter.is_woken());
    let joined = assert_ready!(waiter.poll()).unwrap();
    assert!(joined.ptr_eq(&tools));
    assert_eq!(provider.connects(), 1);
}

#[tokio::test]
async fn test_ready_future_resolves_immediately() {
    let provider = Arc::new(FakeProvider::new());
    let guard = guard_for(&provider, InitPolicy::immediate());
    guard.ensure_initialized().await.unwrap();

    let mut again = tokio_test::task::spawn(guard.ensure_initialized());
    let tools = assert_ready!(again.poll()).unwrap();
    assert_eq!(tools.len(), 2);
}

#[tokio::test]
async fn test_backoff_window_returns_stored_failure() {
    let provider = Arc::new(FakeProvider::new().failing_first(1));
    let policy = InitPolicy::default().with_backoff(Duration::from_secs(3600), Duration::from_secs(3600));
    let guard = guard_for(&provider, policy);

    let first = guard.ensure_initialized().await.unwrap_err();
    let second = guard.ensure_initialized().await.unwrap_err();
    assert_eq!(first.to_string(), second.to_string());
    assert!(guard.on_trigger_without_tools(&TriggerContext::new("researcher")).is_some());
    assert_eq!(provider.connects(), 1);

    guard.reset();
    assert_eq!(guard.state(), InitializationState::Uninitialized);
    guard.ensure_initialized().await.unwrap();
    assert_eq!(provider.connects(), 2);
}

#[tokio::test]
async fn test_gives_up_after_max_attempts() {
    let provider = Arc::new(FakeProvider::new().failing_first(usize::MAX));
    let guard = guard_for(&provider, InitPolicy::immediate().with_max_attempts(2));

    assert!(guard.ensure_initialized().await.is_err());
    assert!(guard.ensure_initialized().await.is_err());
    let err = guard.ensure_initialized().await.unwrap_err();
    assert!(matches!(err, ScoutError::InitExhausted { attempts: 2, .. }));
    assert_eq!(provider.connects(), 2);

    let notice = guard.on_trigger_without_tools(&TriggerContext::new("researcher"));
    assert!(notice.is_some());
    assert_eq!(provider.connects(), 2);
}

#[tokio::test]
async fn test_consumers_attached_exactly_once() {
    let provider = Arc::new(FakeProvider::new());
    let guard = guard_for(&provider, InitPolicy::immediate());

    let early = Arc::new(RecordingConsumer::default());
    guard.notify_ready(early.clone());
    assert!(early.received.lock().is_empty());

    let tools = guard.ensure_initialized().await.unwrap();
    guard.ensure_initialized().await.unwrap();

    let late = Arc::new(RecordingConsumer::default());
    guard.notify_ready(late.clone());

    for consumer in [&early, &late] {
        let received = consumer.received.lock();
        assert_eq!(received.len(), 1);
        assert!(received[0].ptr_eq(&tools));
    }
}

#[test]
fn test_trigger_without_runtime_does_not_panic() {
    let provider = Arc::new(FakeProvider::new());
    let guard = guard_for(&provider, InitPolicy::immediate());

    assert!(guard.on_trigger_without_tools(&TriggerContext::new("researcher")).is_some());
    assert_eq!(guard.attempts(), 0);
    assert_eq!(guard.state(), InitializationState::Uninitialized);
}

#[tokio::test]
async fn test_exit_hook_never_ready_closes_nothing() {
    let provider = Arc::new(FakeProvider::new().failing_first(1));
    let guard = guard_for(&provider, InitPolicy::immediate());
    let _ = guard.ensure_initialized().await;

    ExitHook::register(&guard).run().await;
    guard.close().await;
    assert_eq!(provider.closes(), 0);
}

#[tokio::test]
async fn test_exit_hook_closes_once() {
    let provider = Arc::new(FakeProvider::new());
    let guard = guard_for(&provider, InitPolicy::immediate());
    guard.ensure_initialized().await.unwrap();
    assert!(guard.has_open_connection());

    ExitHook::register(&guard).run().await;
    ExitHook::register(&guard).run().await;
    guard.close().await;

    assert_eq!(provider.closes(), 1);
    assert!(!guard.has_open_connection());
}

#[tokio::test]
async fn test_dropped_exit_hook_closes_on_own_runtime() {
    let provider = Arc::new(FakeProvider::new());
    let guard = guard_for(&provider, InitPolicy::immediate());
    guard.ensure_initialized().await.unwrap();

    drop(ExitHook::register(&guard));
    assert_eq!(provider.closes(), 1);

    drop(ExitHook::register(&guard));
    assert_eq!(provider.closes(), 1);
}

#[tokio::test]
async fn test_close_error_is_swallowed() {
    let provider = Arc::new(FakeProvider::new().with_failing_close());
    let guard = guard_for(&provider, InitPolicy::immediate());
    guard.ensure_initialized().await.unwrap();

    ExitHook::register(&guard).run().await;
    guard.close().await;
    assert_eq!(provider.closes(), 1);
}

#[tokio::test]
async fn test_close_while_connecting_releases_new_connection() {
    let gate = Arc::new(Semaphore::new(0));
    let provider = Arc::new(FakeProvider::new().gated(Arc::clone(&gate)));
    let guard = guard_for(&provider, InitPolicy::immediate());

    guard.on_trigger_without_tools(&TriggerContext::new("researcher"));
    let waiter = {
        let guard = guard.clone();
        tokio::spawn(async move { guard.ensure_initialized().await })
    };

    guard.close().await;
    gate.add_permits(1);

    let err = waiter.await.unwrap().unwrap_err();
    assert!(matches!(err, ScoutError::Cancelled));
    assert!(!guard.is_ready());
    assert_eq!(provider.closes(), 1);
    assert!(matches!(
        guard.ensure_initialized().await,
        Err(ScoutError::Cancelled)
    ));
}

#[tokio::test]
async fn test_two_triggers_then_background_completes() {
    let provider = Arc::new(FakeProvider::new());
    let guard = guard_for(&provider, InitPolicy::immediate());

    let first = guard.on_trigger_without_tools(&TriggerContext::new("researcher"));
    let second = guard.on_trigger_without_tools(&TriggerContext::new("researcher"));
    assert!(first.is_some() && second.is_some());

    while !guard.is_ready() {
        tokio::task::yield_now().await;
    }

    assert!(guard.on_trigger_without_tools(&TriggerContext::new("researcher")).is_none());
    let tools = guard.tools().unwrap();
    assert!(!tools.is_empty());
    assert_eq!(provider.connects(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_retry_after_backoff_elapses_connects_once() {
    let provider = Arc::new(FakeProvider::new().failing_first(1));
    let policy = InitPolicy::default().with_backoff(Duration::from_secs(5), Duration::from_secs(5));
    let guard = guard_for(&provider, policy);

    assert!(guard.ensure_initialized().await.is_err());

    tokio::time::advance(Duration::from_secs(4)).await;
    assert!(guard.ensure_initialized().await.is_err());
    assert_eq!(provider.connects(), 1);

    tokio::time::advance(Duration::from_secs(2)).await;
    let results = futures::future::join_all((0..8).map(|_| guard.ensure_initialized())).await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(provider.connects(), 2);
    assert_eq!(guard.attempts(), 2);
}

#[tokio::test]
async fn test_exit_hook_on_untouched_guard_closes_nothing() {
    let provider = Arc::new(FakeProvider::new());
    let guard = guard_for(&provider, InitPolicy::immediate());

    ExitHook::register(&guard).run().await;
    drop(ExitHook::register(&guard));

    assert_eq!(provider.connects(), 0);
    assert_eq!(provider.closes(), 0);
    assert_eq!(guard.state(), InitializationState::Uninitialized);
}

#[tokio::test]
async fn test_closed_guard_stops_handing_out_tools() {
    let provider = Arc::new(FakeProvider::new());
    let guard = guard_for(&provider, InitPolicy::immediate());
    guard.ensure_initialized().await.unwrap();

    guard.close().await;

    assert!(!guard.is_ready());
    assert!(guard.tools().is_none());
    assert_eq!(guard.state(), InitializationState::Failed);
    assert!(guard.on_trigger_without_tools(&TriggerContext::new("researcher")).is_some());
    assert!(matches!(
        guard.ensure_initialized().await,
        Err(ScoutError::Cancelled)
    ));

    let late = Arc::new(RecordingConsumer::default());
    guard.notify_ready(late.clone());
    assert!(late.received.lock().is_empty());
    assert_eq!(provider.connects(), 1);
}
