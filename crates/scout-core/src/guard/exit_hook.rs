//! Shutdown cleanup for the tool provider connection

use super::init_guard::InitializationGuard;
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound on the drop-path close; the process is exiting anyway
const DROP_CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Closes the guard's provider connection at shutdown.
///
/// Call [`ExitHook::run`] from the shutdown path. If the hook is dropped
/// without running and a connection is open, the connection is closed on a
/// dedicated thread with its own single-threaded runtime, which is torn
/// down afterwards. That close must not rely on tasks of the dropping
/// runtime, which stays blocked until the thread finishes, so it is also
/// bounded by a timeout.
#[derive(Debug)]
pub struct ExitHook {
    guard: Option<InitializationGuard>,
}

impl ExitHook {
    pub fn register(guard: &InitializationGuard) -> Self {
        Self {
            guard: Some(guard.clone()),
        }
    }

    /// Close the connection; later calls and the drop fallback do nothing
    pub async fn run(mut self) {
        if let Some(guard) = self.guard.take() {
            guard.close().await;
        }
    }
}

impl Drop for ExitHook {
    fn drop(&mut self) {
        let Some(guard) = self.guard.take() else {
            return;
        };
        if !guard.has_open_connection() {
            return;
        }

        debug!("Exit hook dropped without running, closing tool provider");
        let worker = std::thread::Builder::new()
            .name("scout-exit-hook".to_string())
            .spawn(move || {
                match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime.block_on(async {
                        if tokio::time::timeout(DROP_CLOSE_TIMEOUT, guard.close()).await.is_err() {
                            warn!("Timed out closing tool provider from exit hook");
                        }
                    }),
                    Err(e) => warn!(error = %e, "Cannot build runtime to close tool provider"),
                }
            });

        match worker {
            Ok(handle) => {
                if handle.join().is_err() {
                    warn!("Exit hook thread panicked while closing tool provider");
                }
            }
            Err(e) => warn!(error = %e, "Cannot spawn exit hook thread"),
        }
    }
}
