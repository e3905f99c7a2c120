//! Metrics collection and exposition.
//!
//! # Metrics
//! - `txgw_requests_total` (counter): requests by outcome
//! - `txgw_validation_failures_total` (counter): rejected requests by kind
//! - `txgw_submissions_total` (counter): submit calls by chain and result
//! - `txgw_submit_duration_seconds` (histogram): submit latency by chain
//! - `txgw_idempotency_entries` (gauge): keys held by the store, in flight or completed
//!
//! Recording is a no-op until a recorder is installed.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the final outcome of a request.
pub fn record_request(outcome: &'static str) {
    counter!("txgw_requests_total", "outcome" => outcome).increment(1);
}

/// Record a validation rejection.
pub fn record_validation_failure(kind: &'static str) {
    counter!("txgw_validation_failures_total", "kind" => kind).increment(1);
}

/// Record a submit call and its latency.
pub fn record_submission(chain: &'static str, ok: bool, start: Instant) {
    let result = if ok { "ok" } else { "error" };
    counter!("txgw_submissions_total", "chain" => chain, "result" => result).increment(1);
    histogram!("txgw_submit_duration_seconds", "chain" => chain)
        .record(start.elapsed().as_secs_f64());
}

/// Record the number of keys held by the idempotency store, in flight or
/// completed.
pub fn record_store_size(size: usize) {
    gauge!("txgw_idempotency_entries").set(size as f64);
}
