//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define page and relay metrics
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `vibe_page_renders_total` (counter): page renders by outcome
//! - `vibe_upstream_requests_total` (counter): upstream fetches by outcome
//! - `vibe_upstream_fetch_duration_seconds` (histogram): time to upstream headers
//! - `vibe_image_bytes_relayed_total` (counter): image bytes streamed to clients
//! - `vibe_image_relays_total` (counter): finished relays by outcome
//!
//! # Design Decisions
//! - Recording is always on; without an installed exporter it is a no-op
//! - Labels are static strings only

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_page_render(outcome: &'static str) {
    metrics::counter!("vibe_page_renders_total", "outcome" => outcome).increment(1);
}

/// Record an upstream fetch that reached `outcome`.
pub fn record_upstream_request(outcome: &'static str, start: Instant) {
    metrics::counter!("vibe_upstream_requests_total", "outcome" => outcome).increment(1);
    metrics::histogram!("vibe_upstream_fetch_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}

/// Record the end of one image relay.
pub fn record_relay(outcome: &'static str, bytes: u64) {
    metrics::counter!("vibe_image_relays_total", "outcome" => outcome).increment(1);
    metrics::counter!("vibe_image_bytes_relayed_total").increment(bytes);
}
