//! Request instrumentation middleware.
//!
//! [`record_exchange`] holds the recording logic. [`MetricsLayer`] wraps any
//! tower service, [`track_metrics`] plugs into axum's `Next` chain; both only
//! adapt their framework to an [`Exchange`].

mod chain;
mod exchange;
mod layer;

pub use chain::track_metrics;
pub use exchange::{Exchange, HttpExchange, record_exchange};
pub use layer::{MetricsLayer, MetricsService};
