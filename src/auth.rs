//! Static bearer-token authentication of API clients.
//!
//! Authentication only names the caller: a successful match stores the
//! client name in the [`RequestContext`] so it becomes the `client` label.

use std::collections::HashMap;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::context::RequestContext;
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

/// Lookup table from bearer token to client name.
#[derive(Debug, Default)]
pub struct ClientDirectory {
    by_token: HashMap<String, String>,
}

impl ClientDirectory {
    pub fn new(clients: &[ClientConfig]) -> Self {
        let mut by_token = HashMap::with_capacity(clients.len());
        for client in clients {
            if by_token
                .insert(client.token.clone(), client.name.clone())
                .is_some()
            {
                warn!(client = %client.name, "duplicate client token, later entry wins");
            }
        }
        ClientDirectory { by_token }
    }

    pub fn lookup(&self, token: &str) -> Option<&str> {
        self.by_token.get(token).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_token.is_empty()
    }
}

/// Extracts the token of an `Authorization: Bearer <token>` header value.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        Some(token.trim()).filter(|t| !t.is_empty())
    } else {
        None
    }
}

/// Axum middleware naming the client behind a request.
///
/// Without an `Authorization` header the request continues anonymously.
/// A header that is not a known bearer token is rejected with `401`.
pub async fn authenticate_client(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(header) = req.headers().get(AUTHORIZATION) else {
        return next.run(req).await;
    };

    let client = header
        .to_str()
        .ok()
        .and_then(bearer_token)
        .and_then(|token| state.clients.lookup(token))
        .map(str::to_string);

    match client {
        Some(client) => {
            debug!(client = %client, "authenticated client");
            RequestContext::attach(req.extensions_mut()).set_client(client);
            next.run(req).await
        }
        None => {
            debug!("rejected request with unknown credentials");
            HTTPError::unauthorized("Unauthorized access").into_response()
        }
    }
}
