//! MCP client implementation
//!
//! Concurrent requests are matched to responses by id. A background task
//! owns the read side of the transport.

mod operations;
mod receiver;

use super::error::McpError;
use super::protocol::{McpMessage, McpNotification, McpRequest, RequestId, methods};
use super::transport::McpTransport;
use super::types::{ClientCapabilities, ClientInfo, InitializeParams, InitializeResult, McpServerInfo, McpTool};
use receiver::PendingRequests;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, oneshot};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, instrument};

/// Default request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

/// MCP client for communicating with MCP servers
pub struct McpClient {
    transport: Arc<dyn McpTransport>,
    pending: PendingRequests,
    server_info: RwLock<Option<McpServerInfo>>,
    tools: RwLock<Vec<McpTool>>,
    request_id: AtomicU64,
    initialized: AtomicBool,
    request_timeout: Duration,
    receiver_handle: parking_lot::Mutex<Option<JoinHandle<()>>>,
}

impl McpClient {
    /// Create a new MCP client with the given transport.
    ///
    /// Must be called from within a Tokio runtime: the receiver task is
    /// spawned immediately.
    pub fn new(transport: Arc<dyn McpTransport>) -> Self {
        Self::with_timeout(transport, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    /// Create a new MCP client with custom request timeout
    pub fn with_timeout(transport: Arc<dyn McpTransport>, request_timeout: Duration) -> Self {
        let pending = PendingRequests::default();
        let receiver_handle = tokio::spawn(receiver::message_receiver(
            Arc::clone(&transport),
            Arc::clone(&pending),
        ));

        Self {
            transport,
            pending,
            server_info: RwLock::new(None),
            tools: RwLock::new(Vec::new()),
            request_id: AtomicU64::new(1),
            initialized: AtomicBool::new(false),
            request_timeout,
            receiver_handle: parking_lot::Mutex::new(Some(receiver_handle)),
        }
    }

    /// Perform the MCP handshake
    #[instrument(skip(self), level = "debug")]
    pub async fn initialize(&self) -> Result<McpServerInfo, McpError> {
        if self.initialized.load(Ordering::SeqCst) {
            return Err(McpError::AlreadyInitialized);
        }

        let params = InitializeParams {
            protocol_version: super::protocol::MCP_PROTOCOL_VERSION.to_string(),
            capabilities: ClientCapabilities::default(),
            client_info: ClientInfo::default(),
        };

        let result: InitializeResult = self.call(methods::INITIALIZE, Some(json!(params))).await?;
        debug!(
            server = %result.server_info.name,
            protocol = %result.protocol_version,
            tools_list_changed = result.capabilities.tools.as_ref().is_some_and(|t| t.list_changed),
            "MCP handshake complete"
        );

        let mut server_info = result.server_info;
        server_info.protocol_version.get_or_insert(result.protocol_version);
        *self.server_info.write().await = Some(server_info.clone());
        self.initialized.store(true, Ordering::SeqCst);

        self.notify(methods::INITIALIZED, None).await?;

        Ok(server_info)
    }

    /// Check if the handshake completed
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Server info reported during the handshake
    pub async fn server_info(&self) -> Option<McpServerInfo> {
        self.server_info.read().await.clone()
    }

    /// Tools returned by the last `list_tools` call
    pub async fn cached_tools(&self) -> Vec<McpTool> {
        self.tools.read().await.clone()
    }

    /// Check if the underlying transport is still connected
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Close the client connection and stop the receiver task.
    ///
    /// The receiver is aborted but not awaited: it belongs to the runtime
    /// that created the client, which may not be the one running `close`.
    pub async fn close(&self) -> Result<(), McpError> {
        self.initialized.store(false, Ordering::SeqCst);
        let result = self.transport.close().await;

        if let Some(handle) = self.receiver_handle.lock().take() {
            handle.abort();
        }

        result
    }

    /// Make a request and wait for the response with timeout
    pub(crate) async fn call<T>(&self, method: &str, params: Option<Value>) -> Result<T, McpError>
    where
        T: serde::de::DeserializeOwned,
    {
        let id = self.next_request_id();
        let id_str = id.to_string();

        let request = McpRequest::new(id, method, params);

        let (response_sender, response_receiver) = oneshot::channel();
        self.pending.lock().insert(id_str.clone(), response_sender);

        if let Err(e) = self.transport.send(McpMessage::Request(request)).await {
            self.pending.lock().remove(&id_str);
            return Err(e);
        }

        let response = match timeout(self.request_timeout, response_receiver).await {
            Ok(Ok(response)) => response,
            Ok(Err(_)) => return Err(McpError::connection("Response channel closed")),
            Err(_) => {
                self.pending.lock().remove(&id_str);
                return Err(McpError::Timeout(self.request_timeout.as_secs()));
            }
        };

        match response.into_result() {
            Ok(value) => serde_json::from_value(value).map_err(McpError::from),
            Err(e) => Err(McpError::Server {
                code: e.code,
                message: e.message,
            }),
        }
    }

    /// Send a notification (no response expected)
    async fn notify(&self, method: &str, params: Option<Value>) -> Result<(), McpError> {
        self.transport
            .send(McpMessage::Notification(McpNotification::new(method, params)))
            .await
    }

    fn next_request_id(&self) -> RequestId {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        match i64::try_from(id) {
            Ok(n) => RequestId::Number(n),
            Err(_) => RequestId::String(format!("req-{}", id)),
        }
    }

    fn ensure_initialized(&self) -> Result<(), McpError> {
        if !self.is_initialized() {
            return Err(McpError::NotInitialized);
        }
        Ok(())
    }
}

impl Drop for McpClient {
    fn drop(&mut self) {
        if let Some(handle) = self.receiver_handle.lock().take() {
            handle.abort();
        }
    }
}
