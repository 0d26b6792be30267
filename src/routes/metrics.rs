//! Prometheus metrics endpoint
//!
//! Exposes upstream call metrics in Prometheus format for monitoring.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
});

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    // Force initialization of the lazy static
    let _ = &*PROMETHEUS_HANDLE;

    register_metrics();
}

fn register_metrics() {
    metrics::describe_counter!(
        "apim_proxy_upstream_requests_total",
        "Total number of calls made to the APIM server"
    );
    metrics::describe_histogram!(
        "apim_proxy_upstream_duration_seconds",
        "APIM call duration in seconds"
    );
}

/// Prometheus metrics endpoint handler
///
/// Returns metrics in Prometheus text format for scraping.
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record an APIM call and its outcome
pub fn record_upstream_request(operation: &str, outcome: &str, duration_secs: f64) {
    metrics::counter!(
        "apim_proxy_upstream_requests_total",
        "operation" => operation.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    metrics::histogram!("apim_proxy_upstream_duration_seconds", "operation" => operation.to_string())
        .record(duration_secs);
}
