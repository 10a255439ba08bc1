//! Metrics for observability.
//!
//! Exports Prometheus-compatible metrics for:
//! - Resolutions by connection mode
//! - Replica construction, reuse and initial sync outcome
//! - Connector close outcome at shutdown
//!
//! # Metric Naming Convention
//!
//! All metrics are prefixed with `replica_connector_` and follow Prometheus
//! conventions:
//! - Counters end in `_total`
//! - Gauges represent current state
//! - Histograms track distributions (duration)
//!
//! No recorder is installed by this crate; the host decides where metrics go.

use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Record one resolution call and the mode it produced.
pub fn record_resolution(role: &str, mode: &str) {
    counter!(
        "replica_connector_resolutions_total",
        "role" => role.to_string(),
        "mode" => mode.to_string()
    )
    .increment(1);
}

/// Record a resolution that failed.
pub fn record_resolution_error(mode: &str) {
    counter!("replica_connector_resolution_errors_total", "mode" => mode.to_string()).increment(1);
}

/// Record construction of a new embedded replica connector.
pub fn record_replica_created(success: bool, duration: Duration) {
    let status = if success { "success" } else { "failure" };
    counter!("replica_connector_replicas_created_total", "status" => status).increment(1);
    histogram!("replica_connector_replica_create_duration_seconds").record(duration.as_secs_f64());
}

/// Record reuse of an already-registered connector.
pub fn record_replica_reused() {
    counter!("replica_connector_replicas_reused_total").increment(1);
}

/// Record the initial blocking sync after construction.
pub fn record_initial_sync(success: bool, duration: Duration) {
    let status = if success { "success" } else { "failure" };
    counter!("replica_connector_initial_syncs_total", "status" => status).increment(1);
    histogram!("replica_connector_initial_sync_duration_seconds").record(duration.as_secs_f64());
}

/// Record a connector close during shutdown.
pub fn record_replica_closed(success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!("replica_connector_replicas_closed_total", "status" => status).increment(1);
}

/// Set the number of live replica connectors.
pub fn set_live_replicas(count: usize) {
    gauge!("replica_connector_live_replicas").set(count as f64);
}
