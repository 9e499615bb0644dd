//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses parse as socket addresses
//! - Validate value ranges (limits > 0, backoff bounds ordered)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("listener.backlog must be greater than zero")]
    ZeroBacklog,

    #[error("listener.max_connections must be greater than zero")]
    ZeroMaxConnections,

    #[error("accept.max_consecutive_errors must be greater than zero")]
    ZeroErrorBudget,

    #[error("accept.backoff_base_ms ({base}) exceeds accept.backoff_max_ms ({max})")]
    BackoffBounds { base: u64, max: u64 },

    #[error("observability.log_level `{0}` is not one of trace, debug, info, warn, error")]
    LogLevel(String),

    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let listener = &config.listener;
    if listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(listener.bind_address.clone()));
    }
    if listener.backlog == 0 {
        errors.push(ValidationError::ZeroBacklog);
    }
    if listener.max_connections == 0 {
        errors.push(ValidationError::ZeroMaxConnections);
    }

    let accept = &config.accept;
    if accept.max_consecutive_errors == 0 {
        errors.push(ValidationError::ZeroErrorBudget);
    }
    if accept.backoff_base_ms > accept.backoff_max_ms {
        errors.push(ValidationError::BackoffBounds {
            base: accept.backoff_base_ms,
            max: accept.backoff_max_ms,
        });
    }

    let observability = &config.observability;
    if !LOG_LEVELS.contains(&observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::LogLevel(observability.log_level.clone()));
    }
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
