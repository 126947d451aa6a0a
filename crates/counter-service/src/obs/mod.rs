//! In-process metrics rendered in Prometheus text format on the admin listener.

pub mod metrics;
