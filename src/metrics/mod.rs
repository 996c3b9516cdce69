//! Metrics collection and exposition for Prometheus.
//!
//! This module owns the `reqs_count` and `reqs_latency` collectors and the
//! helpers used to time requests.

mod recorder;
mod timing;

pub use recorder::{
    HttpServerMetrics, LABEL_NAMES, LATENCY_BUCKETS, LatencySnapshot, MetricsRecorder,
    REQUESTS_COUNT, REQUESTS_LATENCY, RequestLabels,
};
pub use timing::{LatencyUnit, elapsed_millis, elapsed_seconds};
