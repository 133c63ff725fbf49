//! Tool provider seam

use super::tool_set::ToolSet;
use crate::error::ScoutResult;
use async_trait::async_trait;

/// Releases the connection a [`ToolProvider`] opened
#[async_trait]
pub trait ProviderCloser: Send + Sync {
    async fn close(&self) -> ScoutResult<()>;
}

/// Opens a connection to an external tool server and lists its tools
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Connect, returning the tools and the handle that closes them
    async fn connect(&self) -> ScoutResult<(ToolSet, Box<dyn ProviderCloser>)>;
}
