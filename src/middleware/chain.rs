use std::time::Instant;

use axum::extract::{OriginalUri, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use super::exchange::{HttpExchange, record_exchange};
use crate::context::RequestContext;
use crate::metrics::MetricsRecorder;

/// Axum middleware recording request metrics around `next.run`.
///
/// Mount with `axum::middleware::from_fn_with_state(recorder, track_metrics::<R>)`.
/// Inside nested routers the path label is the full original path.
pub async fn track_metrics<R: MetricsRecorder>(
    State(recorder): State<R>,
    mut req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = match req.extensions().get::<OriginalUri>() {
        Some(OriginalUri(uri)) => uri.path().to_owned(),
        None => req.uri().path().to_owned(),
    };
    let ctx = RequestContext::attach(req.extensions_mut());

    let response = next.run(req).await;

    record_exchange(
        &recorder,
        start,
        &HttpExchange::new(&method, &path, response.status(), &ctx),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{HttpServerMetrics, RequestLabels};
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use axum::{Extension, Router};
    use tower::ServiceExt;

    fn app(metrics: HttpServerMetrics) -> Router {
        let api = Router::new()
            .route("/items", get(|| async { StatusCode::ACCEPTED }))
            .route(
                "/mine",
                get(|Extension(ctx): Extension<RequestContext>| async move {
                    ctx.set_client("handler-set");
                    StatusCode::OK
                }),
            );

        Router::new()
            .nest("/api", api)
            .layer(from_fn_with_state(
                metrics,
                track_metrics::<HttpServerMetrics>,
            ))
    }

    #[tokio::test]
    async fn test_chain_records_full_path_of_nested_route() {
        let metrics = HttpServerMetrics::new("svc").unwrap();
        let request = http::Request::builder()
            .uri("/api/items")
            .body(Body::empty())
            .unwrap();

        let response = app(metrics.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let labels = RequestLabels::new("GET", 202, "/api/items", None);
        assert_eq!(metrics.request_count(&labels), Some(1.0));
    }

    #[tokio::test]
    async fn test_chain_sees_client_set_by_handler() {
        let metrics = HttpServerMetrics::new("svc").unwrap();
        let request = http::Request::builder()
            .uri("/api/mine")
            .body(Body::empty())
            .unwrap();

        app(metrics.clone()).oneshot(request).await.unwrap();

        let labels = RequestLabels::new("GET", 200, "/api/mine", Some("handler-set"));
        assert_eq!(metrics.request_count(&labels), Some(1.0));
    }
}
