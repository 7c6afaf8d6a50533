//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_auth_outcomes_total` (counter): verifier results by origin
//! - `gateway_verification_cache_total` (counter): cache hits and misses
//! - `gateway_rate_limited_total` (counter): rejected admissions
//! - `gateway_verification_cache_entries`, `gateway_rate_limit_keys` (gauges)
//!
//! Recording is a no-op until a recorder is installed, so library code and
//! tests can call these freely.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve it on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let status = status.to_string();
    counter!("gateway_requests_total", "method" => method.to_string(), "status" => status.clone())
        .increment(1);
    histogram!("gateway_request_duration_seconds", "method" => method.to_string(), "status" => status)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_auth_outcome(origin: &'static str, outcome: &'static str) {
    counter!("gateway_auth_outcomes_total", "origin" => origin, "outcome" => outcome).increment(1);
}

pub fn record_verification_cache(result: &'static str) {
    counter!("gateway_verification_cache_total", "result" => result).increment(1);
}

pub fn record_verification_cache_size(entries: usize) {
    gauge!("gateway_verification_cache_entries").set(entries as f64);
}

pub fn record_rate_limited(origin: &'static str) {
    counter!("gateway_rate_limited_total", "origin" => origin).increment(1);
}

pub fn record_tracked_keys(keys: usize) {
    gauge!("gateway_rate_limit_keys").set(keys as f64);
}

pub fn record_upstream(service: &'static str, status: u16) {
    counter!("gateway_upstream_requests_total", "service" => service, "status" => status.to_string())
        .increment(1);
}
