//! Library exports for reqmetrics, shared between the binary and tests.

pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod startup;
pub mod state;
pub mod utils;

pub use error::{Error, Result};
