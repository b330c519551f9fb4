//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by route and status
//! - `gateway_request_duration_seconds` (histogram): latency by route
//! - `gateway_admission_rejections_total` (counter): 503s from the gate
//! - `gateway_cache_hits_total` / `gateway_cache_misses_total` (counters)
//! - `gateway_upstream_errors_total` (counter): failures by backend
//!
//! # Design Decisions
//! - Low-overhead updates (atomic operations behind the `metrics` macros)
//! - The Prometheus exporter is optional and runs on its own listener

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed request against its matched route.
pub fn record_request(route: &str, status: u16, start: Instant) {
    let labels = [
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    counter!("gateway_requests_total", &labels).increment(1);
    histogram!("gateway_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_admission_rejection() {
    counter!("gateway_admission_rejections_total").increment(1);
}

pub fn record_cache_hit(key: &str) {
    counter!("gateway_cache_hits_total", "key" => key.to_string()).increment(1);
}

pub fn record_cache_miss(key: &str) {
    counter!("gateway_cache_misses_total", "key" => key.to_string()).increment(1);
}

pub fn record_upstream_error(backend: &str) {
    counter!("gateway_upstream_errors_total", "backend" => backend.to_string()).increment(1);
}
