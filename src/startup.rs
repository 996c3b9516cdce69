//! Application startup and server initialization.
//!
//! This module builds the metrics recorder and the router, then serves
//! requests until the process is stopped.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ConfigV1;
use crate::error::Result;
use crate::routes;
use crate::state::AppState;

/// Initializes and runs the application server.
///
/// # Errors
///
/// Returns an error if the metric collectors cannot be registered, if the
/// server fails to bind to the configured address, or if serving fails.
pub async fn run(config: Arc<ConfigV1>) -> Result<()> {
    let state = AppState::from_config(config.clone())?;

    info!(
        app = %config.metrics.app_name,
        clients = state.clients.len(),
        metrics_path = %config.metrics.path,
        "Starting server on {}",
        config.bind_address
    );

    let app = routes::create_router(state);
    let listener = TcpListener::bind(&config.bind_address).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
