//! SIGINT/SIGTERM handling for graceful shutdown

use futures::stream::StreamExt;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::{Handle, Signals};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Exit code used when a second signal forces the process down
const FORCED_EXIT_CODE: i32 = 130;

/// Turns SIGINT/SIGTERM into a shutdown request.
///
/// The first signal asks the running command to stop so the exit hook can
/// release the tool server. A second signal exits immediately.
pub struct SignalHandler {
    shutdown: watch::Receiver<bool>,
    received: Arc<AtomicU32>,
    handle: Handle,
    task: Option<JoinHandle<()>>,
}

impl SignalHandler {
    /// Start listening for signals
    pub fn start() -> std::io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM])?;
        let handle = signals.handle();
        let (sender, shutdown) = watch::channel(false);
        let received = Arc::new(AtomicU32::new(0));

        let counter = Arc::clone(&received);
        let task = tokio::spawn(async move {
            while let Some(signal) = signals.next().await {
                match signal {
                    SIGINT | SIGTERM => {
                        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                            eprintln!("\nShutting down... (press Ctrl+C again to force)");
                            let _ = sender.send(true);
                        } else {
                            eprintln!("\nForced exit");
                            std::process::exit(FORCED_EXIT_CODE);
                        }
                    }
                    _ => {}
                }
            }
        });

        Ok(Self {
            shutdown,
            received,
            handle,
            task: Some(task),
        })
    }

    /// Whether a shutdown signal has arrived
    pub fn shutdown_requested(&self) -> bool {
        self.received.load(Ordering::SeqCst) > 0
    }

    /// Resolves once a shutdown signal arrives
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut shutdown = self.shutdown.clone();
        async move {
            // A closed channel means the listener is gone; never resolve then
            if shutdown.wait_for(|requested| *requested).await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }

    /// Stop listening
    pub fn stop(mut self) {
        self.handle.close();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
