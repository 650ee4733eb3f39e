//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by mode (proxy/intercept) and status
//! - `proxy_request_duration_seconds` (histogram): latency by mode
//! - `intercept_handler_failures_total` (counter): contained handler failures
//! - `notifications_total` (counter): notifications by outcome
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics listener started");
    Ok(())
}

pub fn record_request(mode: &'static str, status: u16, start: Instant) {
    metrics::counter!("proxy_requests_total", "mode" => mode, "status" => status.to_string()).increment(1);
    metrics::histogram!("proxy_request_duration_seconds", "mode" => mode).record(start.elapsed().as_secs_f64());
}

pub fn record_handler_failure(handler: &'static str) {
    metrics::counter!("intercept_handler_failures_total", "handler" => handler).increment(1);
}

pub fn record_notification(outcome: &'static str) {
    metrics::counter!("notifications_total", "outcome" => outcome).increment(1);
}
