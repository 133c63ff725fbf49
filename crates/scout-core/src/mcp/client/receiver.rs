//! Background message receiver for MCP client

use super::super::protocol::{McpMessage, McpResponse, McpRpcError, RequestId, methods};
use super::super::transport::McpTransport;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, error, warn};

/// Requests waiting for a response, keyed by request id
pub(super) type PendingRequests = Arc<Mutex<HashMap<String, oneshot::Sender<McpResponse>>>>;

/// Background task that receives messages and routes responses to callers.
///
/// Runs until the transport reports an error (including EOF after close);
/// every request still pending at that point is failed.
pub(super) async fn message_receiver(transport: Arc<dyn McpTransport>, pending: PendingRequests) {
    loop {
        match transport.receive().await {
            Ok(McpMessage::Response(response)) => {
                let id = response.id.to_string();
                let sender = pending.lock().remove(&id);
                match sender {
                    Some(sender) => {
                        if sender.send(response).is_err() {
                            debug!("Caller for request {} went away before the response", id);
                        }
                    }
                    None => warn!("Received response for unknown request: {}", id),
                }
            }
            Ok(McpMessage::Notification(notification)) => {
                debug!("Received notification: {}", notification.method);
            }
            Ok(McpMessage::Request(request)) => {
                let reply = if request.method == methods::PING {
                    McpResponse::success(request.id, json!({}))
                } else {
                    warn!("Unsupported server request: {}", request.method);
                    McpResponse::error(request.id, McpRpcError::method_not_found())
                };
                if let Err(e) = transport.send(McpMessage::Response(reply)).await {
                    warn!("Failed to answer server request: {}", e);
                }
            }
            Err(e) => {
                if transport.is_connected() {
                    error!("Error receiving MCP message: {}", e);
                } else {
                    debug!("MCP message receiver stopping: {}", e);
                }
                let drained: Vec<_> = pending.lock().drain().collect();
                for (id, sender) in drained {
                    warn!("Cancelling pending request {} due to connection error", id);
                    let _ = sender.send(McpResponse::error(
                        RequestId::String(id),
                        McpRpcError::new(-32000, e.to_string()),
                    ));
                }
                break;
            }
        }
    }
}
