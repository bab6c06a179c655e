//! Structured logging and lightweight diagnostic counters.

pub mod logger;
pub mod metrics;
pub mod tracing;

pub use logger::{LogLevel, Logger, TracingLogger};
pub use metrics::{Metrics, MetricsSnapshot};
pub use tracing::{init_tracing, shutdown_tracing};
