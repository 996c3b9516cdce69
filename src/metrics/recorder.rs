//! Metrics recording implementation using Prometheus.

use prometheus::proto::Metric;
use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use std::time::Instant;

use super::timing::LatencyUnit;
use crate::config::MetricsConfig;
use crate::error::Result;

pub const REQUESTS_COUNT: &str = "reqs_count";
pub const REQUESTS_LATENCY: &str = "reqs_latency";

/// Bucket boundaries of `reqs_latency`, in the recorder's [`LatencyUnit`].
pub const LATENCY_BUCKETS: [f64; 12] = [
    5.0, 10.0, 20.0, 30.0, 50.0, 70.0, 100.0, 150.0, 200.0, 300.0, 500.0, 1000.0,
];

/// Variable label names, in the order label values are passed to the collectors.
pub const LABEL_NAMES: [&str; 4] = ["method", "status", "path", "client"];

/// Trait for recording per-request HTTP metrics.
pub trait MetricsRecorder: Clone + Send + Sync + 'static {
    /// Increments the request counter for the given label values by one.
    fn increment_request_count(&self, method: &str, status: &str, path: &str, client: &str);

    /// Records one latency sample for the given label values.
    fn observe_latency(&self, elapsed: f64, method: &str, status: &str, path: &str, client: &str);

    /// Time elapsed since `start`, in the unit `observe_latency` expects.
    fn elapsed_since(&self, start: Instant) -> f64;
}

/// One label tuple of `reqs_count` / `reqs_latency`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RequestLabels {
    pub method: String,
    pub status: String,
    pub path: String,
    pub client: String,
}

impl RequestLabels {
    /// Builds a label tuple; a missing client becomes the empty string.
    pub fn new(method: &str, status: u16, path: &str, client: Option<&str>) -> Self {
        RequestLabels {
            method: method.to_string(),
            status: status.to_string(),
            path: path.to_string(),
            client: client.unwrap_or_default().to_string(),
        }
    }

    /// Label values ordered like [`LABEL_NAMES`].
    pub fn values(&self) -> [&str; 4] {
        [&self.method, &self.status, &self.path, &self.client]
    }
}

/// Count and sum of the samples recorded for one label tuple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencySnapshot {
    pub count: u64,
    pub sum: f64,
}

/// Prometheus collectors for HTTP server requests.
///
/// Cloning is cheap and every clone writes into the same collectors.
#[derive(Clone)]
pub struct HttpServerMetrics {
    registry: Arc<Registry>,
    unit: LatencyUnit,
    reqs_count: CounterVec,
    reqs_latency: HistogramVec,
}

impl HttpServerMetrics {
    /// Creates the collectors in a fresh registry, observing milliseconds.
    pub fn new(app_name: &str) -> Result<Self> {
        Self::with_registry(app_name, LatencyUnit::default(), Arc::new(Registry::new()))
    }

    /// Creates the collectors described by the `metrics` configuration section.
    pub fn from_config(config: &MetricsConfig) -> Result<Self> {
        Self::with_registry(
            &config.app_name,
            config.latency_unit,
            Arc::new(Registry::new()),
        )
    }

    /// Creates the collectors and registers them in `registry`.
    ///
    /// # Errors
    ///
    /// Fails if `reqs_count` or `reqs_latency` is already registered there.
    pub fn with_registry(
        app_name: &str,
        unit: LatencyUnit,
        registry: Arc<Registry>,
    ) -> Result<Self> {
        let reqs_count = CounterVec::new(
            Opts::new(REQUESTS_COUNT, "How many HTTP requests processed")
                .const_label("app", app_name),
            &LABEL_NAMES,
        )?;
        let reqs_latency = HistogramVec::new(
            HistogramOpts::new(REQUESTS_LATENCY, "How long it took to process the request")
                .const_label("app", app_name)
                .buckets(LATENCY_BUCKETS.to_vec()),
            &LABEL_NAMES,
        )?;

        registry.register(Box::new(reqs_count.clone()))?;
        if let Err(e) = registry.register(Box::new(reqs_latency.clone())) {
            // Leave the registry as it was before the call.
            let _ = registry.unregister(Box::new(reqs_count.clone()));
            return Err(e.into());
        }

        tracing::debug!(app = app_name, unit = ?unit, "registered HTTP server metrics");

        Ok(HttpServerMetrics {
            registry,
            unit,
            reqs_count,
            reqs_latency,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn latency_unit(&self) -> LatencyUnit {
        self.unit
    }

    /// Renders all metrics of the registry in Prometheus text format.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Content type of [`render`](Self::render) output.
    pub fn content_type(&self) -> &'static str {
        prometheus::TEXT_FORMAT
    }

    /// Current `reqs_count` value for `labels`, if that cell exists.
    pub fn request_count(&self, labels: &RequestLabels) -> Option<f64> {
        self.find_metric(REQUESTS_COUNT, labels)
            .map(|metric| metric.get_counter().get_value())
    }

    /// Current `reqs_latency` sample count and sum for `labels`, if that cell exists.
    pub fn latency_snapshot(&self, labels: &RequestLabels) -> Option<LatencySnapshot> {
        self.find_metric(REQUESTS_LATENCY, labels).map(|metric| {
            let histogram = metric.get_histogram();
            LatencySnapshot {
                count: histogram.get_sample_count(),
                sum: histogram.get_sample_sum(),
            }
        })
    }

    // Reads through gather() so lookups never create empty cells.
    fn find_metric(&self, name: &str, labels: &RequestLabels) -> Option<Metric> {
        let families = self.registry.gather();
        let family = families.iter().find(|family| family.get_name() == name)?;
        family
            .get_metric()
            .iter()
            .find(|metric| {
                LABEL_NAMES.iter().zip(labels.values()).all(|(name, value)| {
                    metric
                        .get_label()
                        .iter()
                        .any(|pair| pair.get_name() == *name && pair.get_value() == value)
                })
            })
            .cloned()
    }
}

impl MetricsRecorder for HttpServerMetrics {
    fn increment_request_count(&self, method: &str, status: &str, path: &str, client: &str) {
        self.reqs_count
            .with_label_values(&[method, status, path, client])
            .inc();
    }

    fn observe_latency(&self, elapsed: f64, method: &str, status: &str, path: &str, client: &str) {
        self.reqs_latency
            .with_label_values(&[method, status, path, client])
            .observe(elapsed);
    }

    fn elapsed_since(&self, start: Instant) -> f64 {
        self.unit.elapsed_since(start)
    }
}
