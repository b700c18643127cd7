//! Metrics Adapters - Prometheus Export and Health Probes

pub mod health;
pub mod prometheus;

pub use health::{HealthServer, HealthState};
pub use prometheus::MetricsRegistry;
