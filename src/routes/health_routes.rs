//! Liveness endpoint.

use crate::state::AppState;
use axum::{Router, http::StatusCode, routing::get};

/// Registers the liveness route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// Always answers `200 OK`; measured like any application route.
async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
