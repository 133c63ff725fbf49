//! Standard I/O transport for MCP
//!
//! Spawns a subprocess and communicates via stdin/stdout.

use super::McpTransport;
use crate::config::McpServerConfig;
use crate::mcp::error::McpError;
use crate::mcp::protocol::McpMessage;
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// How long `close` waits for the server to exit after stdin is dropped
const GRACEFUL_EXIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Stdio transport for MCP communication
pub struct StdioTransport {
    child: Mutex<Option<Child>>,
    stdin: Mutex<Option<ChildStdin>>,
    stdout: Mutex<BufReader<ChildStdout>>,
    connected: AtomicBool,
}

impl StdioTransport {
    /// Spawn the server described by `config`.
    ///
    /// Environment values are passed to the child unchanged and never logged.
    pub async fn spawn(config: &McpServerConfig) -> Result<Self, McpError> {
        let mut cmd = Command::new(&config.command);

        cmd.args(&config.args)
            .envs(&config.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        debug!(
            command = %config.command,
            args = ?config.args,
            env_keys = ?config.env_keys(),
            "Spawning MCP server"
        );

        let mut child = cmd.spawn().map_err(|e| {
            McpError::connection(format!(
                "Failed to spawn MCP server '{}': {}",
                config.command, e
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| McpError::connection("Failed to get stdin handle"))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| McpError::connection("Failed to get stdout handle"))?;

        Ok(Self {
            child: Mutex::new(Some(child)),
            stdin: Mutex::new(Some(stdin)),
            stdout: Mutex::new(BufReader::new(stdout)),
            connected: AtomicBool::new(true),
        })
    }
}

#[async_trait]
impl McpTransport for StdioTransport {
    async fn send(&self, message: McpMessage) -> Result<(), McpError> {
        let mut guard = self.stdin.lock().await;
        let stdin = guard.as_mut().ok_or(McpError::NotInitialized)?;

        let json = serde_json::to_string(&message)?;

        stdin.write_all(json.as_bytes()).await?;
        stdin.write_all(b"\n").await?;
        stdin.flush().await?;

        Ok(())
    }

    async fn receive(&self) -> Result<McpMessage, McpError> {
        let mut stdout = self.stdout.lock().await;
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = stdout.read_line(&mut line).await?;

            if bytes_read == 0 {
                self.connected.store(false, Ordering::SeqCst);
                return Err(McpError::connection("Connection closed"));
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            // npx wrappers sometimes print banners on stdout
            match serde_json::from_str::<McpMessage>(trimmed) {
                Ok(message) => return Ok(message),
                Err(e) => warn!("Skipping non-JSON line from MCP server: {}", e),
            }
        }
    }

    async fn close(&self) -> Result<(), McpError> {
        self.connected.store(false, Ordering::SeqCst);

        // Closing stdin signals EOF to the server
        self.stdin.lock().await.take();

        let child = self.child.lock().await.take();
        if let Some(mut child) = child {
            tokio::select! {
                result = child.wait() => {
                    result.map_err(|e| McpError::transport(e.to_string()))?;
                }
                _ = tokio::time::sleep(GRACEFUL_EXIT_TIMEOUT) => {
                    warn!("MCP server did not exit in time, killing it");
                    // Not awaited: the reaper may belong to a runtime that is not polling
                    if let Err(e) = child.start_kill() {
                        warn!("Failed to kill MCP server: {}", e);
                    }
                }
            }
        }

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
