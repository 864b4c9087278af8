//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by vhost, route, status
//! - `gateway_request_duration_seconds` (histogram): time to response head
//!
//! Without an installed recorder the macros are no-ops.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::observability::access_log::RouteKind;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished request.
pub fn record_request(vhost: &str, route: Option<RouteKind>, status: u16, start: Instant) {
    let route = route.map(|r| r.as_str()).unwrap_or("none");
    metrics::counter!(
        "gateway_requests_total",
        "vhost" => vhost.to_string(),
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "gateway_request_duration_seconds",
        "vhost" => vhost.to_string(),
        "route" => route
    )
    .record(start.elapsed().as_secs_f64());
}
