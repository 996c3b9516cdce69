//! Shared application state.
//!
//! Contains the state that is shared across all request handlers:
//! configuration, the metrics recorder and the client directory.

use crate::auth::ClientDirectory;
use crate::config::ConfigV1;
use crate::metrics::HttpServerMetrics;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// This state is cloned for each request handler; the recorder is built
/// once at startup and every clone writes into the same collectors.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Request count and latency collectors.
    pub metrics: HttpServerMetrics,
    /// Bearer tokens of known API clients.
    pub clients: Arc<ClientDirectory>,
}

impl AppState {
    /// Builds the state described by `config`.
    ///
    /// # Errors
    ///
    /// Fails if the metric collectors cannot be registered.
    pub fn from_config(config: Arc<ConfigV1>) -> crate::Result<Self> {
        let metrics = HttpServerMetrics::from_config(&config.metrics)?;
        let clients = Arc::new(ClientDirectory::new(&config.clients));
        Ok(AppState {
            config,
            metrics,
            clients,
        })
    }
}
