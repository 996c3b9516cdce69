use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::metrics::LatencyUnit;

/// Settings of the request metrics and of the scrape endpoint.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct MetricsConfig {
    /// Value of the constant `app` label on every series.
    pub app_name: String,
    /// Path the scrape endpoint is mounted on.
    #[serde(default = "default_metrics_path")]
    pub path: String,
    #[serde(default)]
    pub latency_unit: LatencyUnit,
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}
