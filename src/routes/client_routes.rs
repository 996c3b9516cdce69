//! Client identity endpoint.

use axum::{Extension, Router, routing::get};

use crate::context::RequestContext;
use crate::state::AppState;

/// Registers client identity routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/whoami", get(whoami))
}

/// Returns the client name the request was authenticated as.
async fn whoami(ctx: Option<Extension<RequestContext>>) -> String {
    ctx.as_ref()
        .and_then(|Extension(ctx)| ctx.client())
        .unwrap_or("anonymous")
        .to_string()
}
