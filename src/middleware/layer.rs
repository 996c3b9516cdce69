use std::task::{Context, Poll};
use std::time::Instant;

use futures::future::BoxFuture;
use http::{Request, Response};
use tower::{Layer, Service};

use super::exchange::{HttpExchange, record_exchange};
use crate::context::RequestContext;
use crate::metrics::MetricsRecorder;

/// Tower layer that records `reqs_count` and `reqs_latency` for every
/// response produced by the wrapped service.
#[derive(Clone)]
pub struct MetricsLayer<R> {
    recorder: R,
}

impl<R> MetricsLayer<R> {
    pub fn new(recorder: R) -> Self {
        Self { recorder }
    }
}

impl<S, R: Clone> Layer<S> for MetricsLayer<R> {
    type Service = MetricsService<S, R>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsService {
            inner,
            recorder: self.recorder.clone(),
        }
    }
}

#[derive(Clone)]
pub struct MetricsService<S, R> {
    inner: S,
    recorder: R,
}

impl<S, R, ReqBody, ResBody> Service<Request<ReqBody>> for MetricsService<S, R>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    R: MetricsRecorder,
    ResBody: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_owned();
        let ctx = RequestContext::attach(req.extensions_mut());
        let recorder = self.recorder.clone();

        let future = self.inner.call(req);

        Box::pin(async move {
            // An Err carries no status code, so it is passed on unrecorded.
            let response = future.await?;
            record_exchange(
                &recorder,
                start,
                &HttpExchange::new(&method, &path, response.status(), &ctx),
            );
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{HttpServerMetrics, RequestLabels};
    use http::StatusCode;
    use std::convert::Infallible;
    use std::rc::Rc;
    use tower::{ServiceBuilder, ServiceExt, service_fn};

    async fn teapot(req: Request<()>) -> Result<Response<String>, Infallible> {
        if let Some(ctx) = RequestContext::from_extensions(req.extensions()) {
            ctx.set_client("inner-auth");
        }
        let mut response = Response::new("short and stout".to_string());
        *response.status_mut() = StatusCode::IM_A_TEAPOT;
        Ok(response)
    }

    #[tokio::test]
    async fn test_layer_records_status_and_client_set_by_inner_service() {
        let metrics = HttpServerMetrics::new("svc").unwrap();
        let service = ServiceBuilder::new()
            .layer(MetricsLayer::new(metrics.clone()))
            .service(service_fn(teapot));

        let request = Request::builder()
            .method("PUT")
            .uri("/pot?brew=1")
            .body(())
            .unwrap();
        let response = service.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(response.body(), "short and stout");

        let labels = RequestLabels::new("PUT", 418, "/pot", Some("inner-auth"));
        assert_eq!(metrics.request_count(&labels), Some(1.0));
        assert_eq!(metrics.latency_snapshot(&labels).unwrap().count, 1);
    }

    #[tokio::test]
    async fn test_layer_propagates_errors_without_recording() {
        let metrics = HttpServerMetrics::new("svc").unwrap();
        let service = ServiceBuilder::new()
            .layer(MetricsLayer::new(metrics.clone()))
            .service(service_fn(|_req: Request<()>| async {
                Err::<Response<()>, _>("boom")
            }));

        let result = service.oneshot(Request::new(())).await;
        assert_eq!(result.unwrap_err(), "boom");
        assert!(!metrics.render().unwrap().contains("reqs_count"));
    }

    #[tokio::test]
    async fn test_layer_accepts_non_send_request_bodies() {
        let metrics = HttpServerMetrics::new("svc").unwrap();
        let service = ServiceBuilder::new()
            .layer(MetricsLayer::new(metrics.clone()))
            .service(service_fn(|req: Request<Rc<str>>| {
                let len = req.body().len();
                std::future::ready(Ok::<_, Infallible>(Response::new(len.to_string())))
            }));

        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .body(Rc::from("payload"))
            .unwrap();
        let response = service.oneshot(request).await.unwrap();
        assert_eq!(response.body(), "7");

        let labels = RequestLabels::new("POST", 200, "/upload", None);
        assert_eq!(metrics.request_count(&labels), Some(1.0));
    }
}
