//! Prometheus metrics for mural-server.
//!
//! Provides metrics collection and a Prometheus-compatible `/metrics` endpoint.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

// Metric names as constants for consistency
const STROKES_TOTAL: &str = "mural_strokes_total";
const SNAPSHOTS_WRITTEN_TOTAL: &str = "mural_snapshots_written_total";
const SESSIONS_ACTIVE: &str = "mural_sessions_active";
const RASTERIZE_DURATION: &str = "mural_stroke_rasterize_duration_seconds";

/// Initialize metrics and return the Prometheus handle.
///
/// # Errors
///
/// Returns an error if the Prometheus recorder cannot be installed
/// (e.g., if another recorder is already installed).
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Record a stroke that passed validation and entered the log.
pub fn record_stroke_accepted() {
    counter!(STROKES_TOTAL, "outcome" => "accepted").increment(1);
}

/// Record a stroke dropped by validation.
pub fn record_stroke_rejected() {
    counter!(STROKES_TOTAL, "outcome" => "rejected").increment(1);
}

/// Record a canvas snapshot written to disk.
pub fn record_snapshot_written() {
    counter!(SNAPSHOTS_WRITTEN_TOTAL).increment(1);
}

/// Update the active polling session count.
pub fn set_active_sessions(count: u32) {
    gauge!(SESSIONS_ACTIVE).set(f64::from(count));
}

/// Record how long one stroke took to rasterize.
pub fn record_rasterize_duration(seconds: f64) {
    histogram!(RASTERIZE_DURATION).record(seconds);
}
