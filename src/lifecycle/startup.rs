//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter if enabled
//! - Bind the listener (fail fast: a bind error is fatal)
//! - Wire OS signals to the shutdown coordinator
//! - Run the accept loop to completion

use std::net::SocketAddr;

use crate::config::validation::ValidationError;
use crate::config::{ConfigError, ServerConfig};
use crate::error::ServerError;
use crate::handler::AnnounceHandler;
use crate::lifecycle::{signals, Shutdown};
use crate::net::ListenerError;
use crate::observability::metrics;
use crate::server::Server;

/// Bring the server up with the stdout announcer and run until shutdown or a fatal error.
pub async fn run(config: ServerConfig, shutdown: Shutdown) -> Result<(), ServerError> {
    let observability = &config.observability;
    if observability.metrics_enabled {
        let addr: SocketAddr = observability.metrics_address.parse().map_err(|_| {
            ConfigError::Validation(vec![ValidationError::MetricsAddress(
                observability.metrics_address.clone(),
            )])
        })?;
        metrics::init_metrics(addr)?;
    }

    let server = Server::bind(&config, AnnounceHandler::stdout())?;
    let local_addr = server.local_addr().map_err(|source| ListenerError::Bind {
        addr: config.listener.bind_address.clone(),
        source,
    })?;
    tracing::info!(address = %local_addr, "Listening for connections");

    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    server.run(shutdown.subscribe()).await
}
