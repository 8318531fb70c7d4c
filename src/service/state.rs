//! Application state for the upload service.

use crate::config::Config;
use crate::fetch::MetadataSource;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Shared state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Effective configuration
    pub config: Arc<Config>,
    /// Metadata provider shared by all requests
    pub source: Arc<dyn MetadataSource>,
    /// Cancelled when the server shuts down; in-flight estimates stop early
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: Arc<Config>, source: Arc<dyn MetadataSource>) -> Self {
        Self {
            config,
            source,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }
}
