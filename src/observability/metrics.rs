//! Metrics collection and exposition.
//!
//! # Metrics
//! - `harness_requests_total` (counter): requests by method, route, status
//! - `harness_request_duration_seconds` (histogram): latency by route
//! - `harness_processing_delay_ms` (histogram): simulated delays drawn
//! - `harness_generated_logs_total` (counter): synthetic entries by level

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::harness::{LevelTally, Severity};

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    metrics::counter!(
        "harness_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("harness_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_processing_delay(delay_ms: u64) {
    metrics::histogram!("harness_processing_delay_ms").record(delay_ms as f64);
}

pub fn record_generated_logs(tally: &LevelTally) {
    for severity in Severity::ALL {
        let emitted = tally.get(severity);
        if emitted > 0 {
            metrics::counter!("harness_generated_logs_total", "level" => severity.as_str())
                .increment(emitted);
        }
    }
}
