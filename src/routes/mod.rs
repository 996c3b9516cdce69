//! HTTP route definitions and handlers.
//!
//! Application routes are measured by the metrics middleware and sit behind
//! the authentication step; the scrape endpoint is mounted outside both.

mod client_routes;
mod health_routes;
mod metrics;

use crate::auth::authenticate_client;
use crate::middleware::MetricsLayer;
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;
use axum::Router;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;

/// Creates the application router with all configured routes.
///
/// The metrics layer is outermost so `401` responses of the authentication
/// step are recorded too. The fallback is installed before the layers so
/// requests to unknown paths are measured as `404`.
pub fn create_router(state: AppState) -> Router {
    let metrics_path = state.config.metrics.path.clone();

    Router::new()
        .merge(health_routes::routes())
        .merge(client_routes::routes())
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), authenticate_client))
        .layer(MetricsLayer::new(state.metrics.clone()))
        .merge(metrics::routes(&metrics_path))
        .with_state(state)
}

async fn not_found() -> HTTPError {
    HTTPError::new(StatusCode::NOT_FOUND, "Not found", None)
}
