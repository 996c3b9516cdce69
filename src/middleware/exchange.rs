use std::time::Instant;

use http::{Method, StatusCode};

use crate::context::RequestContext;
use crate::metrics::{MetricsRecorder, RequestLabels};

/// A completed request/response pair, as seen by the recorder.
pub trait Exchange {
    fn method(&self) -> &str;

    /// Raw request path, without the query string.
    fn path(&self) -> &str;

    /// Final status code set by the handler.
    fn status_code(&self) -> u16;

    fn context(&self) -> Option<&RequestContext>;
}

/// [`Exchange`] over the `http` types shared by tower and axum.
pub struct HttpExchange<'a> {
    method: &'a Method,
    path: &'a str,
    status: StatusCode,
    context: &'a RequestContext,
}

impl<'a> HttpExchange<'a> {
    pub fn new(
        method: &'a Method,
        path: &'a str,
        status: StatusCode,
        context: &'a RequestContext,
    ) -> Self {
        HttpExchange {
            method,
            path,
            status,
            context,
        }
    }
}

impl Exchange for HttpExchange<'_> {
    fn method(&self) -> &str {
        self.method.as_str()
    }

    fn path(&self) -> &str {
        self.path
    }

    fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    fn context(&self) -> Option<&RequestContext> {
        Some(self.context)
    }
}

/// Reports one finished request: a `reqs_count` increment and a
/// `reqs_latency` sample, both with the same labels.
///
/// A missing context or an unauthenticated request yields an empty client label.
pub fn record_exchange<R, E>(recorder: &R, start: Instant, exchange: &E) -> RequestLabels
where
    R: MetricsRecorder,
    E: Exchange + ?Sized,
{
    let elapsed = recorder.elapsed_since(start);
    let client = exchange.context().and_then(RequestContext::client);
    let labels = RequestLabels::new(
        exchange.method(),
        exchange.status_code(),
        exchange.path(),
        client,
    );

    let [method, status, path, client] = labels.values();
    recorder.increment_request_count(method, status, path, client);
    recorder.observe_latency(elapsed, method, status, path, client);

    tracing::debug!(method, status, path, client, elapsed, "recorded request metrics");

    labels
}
