//! Elapsed-time helpers for latency observations.

use std::time::Instant;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Milliseconds elapsed since `start`, with sub-millisecond precision.
pub fn elapsed_millis(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Seconds elapsed since `start`.
pub fn elapsed_seconds(start: Instant) -> f64 {
    start.elapsed().as_secs_f64()
}

/// Unit of every sample a recorder writes into `reqs_latency`.
///
/// The bucket boundaries (5 .. 1000) read naturally as milliseconds, so that
/// is the default. A recorder holds exactly one unit for its whole lifetime.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LatencyUnit {
    #[default]
    Milliseconds,
    Seconds,
}

impl LatencyUnit {
    pub fn elapsed_since(self, start: Instant) -> f64 {
        match self {
            LatencyUnit::Milliseconds => elapsed_millis(start),
            LatencyUnit::Seconds => elapsed_seconds(start),
        }
    }
}
