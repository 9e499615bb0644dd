//! Metrics collection and exposition.
//!
//! # Metrics
//! - `acceptor_connections_accepted_total` (counter): accepted connections
//! - `acceptor_accept_errors_total` (counter): failed accepts by `kind` (transient, fatal)
//! - `acceptor_active_connections` (gauge): live connections
//!
//! Updates go through the `metrics` facade and are no-ops until a recorder is
//! installed by [`init_metrics`].

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::resilience::AcceptErrorKind;

/// Install the Prometheus recorder and serve it over HTTP on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_accepted() {
    ::metrics::counter!("acceptor_connections_accepted_total").increment(1);
}

pub fn record_accept_error(kind: AcceptErrorKind) {
    ::metrics::counter!("acceptor_accept_errors_total", "kind" => kind.as_str()).increment(1);
}

pub fn set_active_connections(count: u64) {
    ::metrics::gauge!("acceptor_active_connections").set(count as f64);
}
