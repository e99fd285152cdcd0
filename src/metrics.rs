//! Metrics for upstream latency and request accounting.
//!
//! Recording goes through the `metrics` facade and is a no-op until a
//! recorder is installed; [`install_prometheus`] installs one.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{debug, info};

use crate::error::UpstreamError;
use crate::upstream::Provider;

// === Metric Name Constants ===

/// Upstream request latency metric name.
pub const METRIC_UPSTREAM_LATENCY: &str = "upstream_request_latency_ms";
/// Upstream failures counter metric name.
pub const METRIC_UPSTREAM_FAILURES: &str = "upstream_failures_total";
/// API requests counter metric name.
pub const METRIC_API_REQUESTS: &str = "api_requests_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_UPSTREAM_LATENCY,
        "Upstream provider request latency in milliseconds"
    );
    describe_counter!(
        METRIC_UPSTREAM_FAILURES,
        "Total number of failed upstream calls by failure kind"
    );
    describe_counter!(METRIC_API_REQUESTS, "Total number of API requests by endpoint");

    debug!("Metrics initialized");
}

/// Install the Prometheus exporter listening on `port`.
pub fn install_prometheus(port: u16) -> Result<(), String> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("failed to install Prometheus exporter: {e}"))?;

    info!("Prometheus exporter listening on {}", addr);
    Ok(())
}

/// Record upstream request latency.
pub fn record_upstream_latency(provider: Provider, start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_UPSTREAM_LATENCY, "provider" => provider.as_str()).record(latency_ms);
}

/// Count an upstream failure.
pub fn record_upstream_failure(provider: Provider, err: &UpstreamError) {
    counter!(
        METRIC_UPSTREAM_FAILURES,
        "provider" => provider.as_str(),
        "kind" => err.kind()
    )
    .increment(1);
}

/// Count an API request.
pub fn record_api_request(endpoint: &'static str) {
    counter!(METRIC_API_REQUESTS, "endpoint" => endpoint).increment(1);
}
