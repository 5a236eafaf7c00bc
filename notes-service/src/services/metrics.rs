//! Prometheus metrics for notes-service.
//!
//! Service counters live in the default `prometheus` registry. HTTP request
//! metrics are emitted through the `metrics` facade by the shared middleware
//! and rendered by the installed Prometheus recorder.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};
use std::sync::{Once, OnceLock};

static RECORDER_INIT: Once = Once::new();
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Counter for note operations by operation and outcome.
pub static NOTE_OPERATIONS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "notes_operations_total",
        "Total number of note operations",
        &["operation", "outcome"]
    )
    .expect("Failed to register NOTE_OPERATIONS")
});

/// Histogram for database query duration.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "notes_db_query_duration_seconds",
        "Database query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
    )
    .expect("Failed to register DB_QUERY_DURATION")
});

/// Initialize all metrics. Safe to call more than once.
pub fn init_metrics() {
    RECORDER_INIT.call_once(|| match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = METRICS_HANDLE.set(handle);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Prometheus recorder not installed; HTTP metrics disabled");
        }
    });

    Lazy::force(&NOTE_OPERATIONS);
    Lazy::force(&DB_QUERY_DURATION);
}

/// Get all metrics as Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_default();

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode prometheus metrics");
    }
    output.push_str(&String::from_utf8_lossy(&buffer));

    output
}

/// Record a note operation outcome (`ok`, `rejected`, `not_found`, `error`).
pub fn record_operation(operation: &str, outcome: &str) {
    NOTE_OPERATIONS
        .with_label_values(&[operation, outcome])
        .inc();
}
