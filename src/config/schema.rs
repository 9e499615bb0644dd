//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the acceptor.
//! All types derive Serde traits for deserialization from config files.

use serde::Deserialize;

/// Root configuration for the acceptor.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address, socket options).
    pub listener: ListenerConfig,

    /// Accept loop behavior.
    pub accept: AcceptConfig,

    /// Startup and shutdown settings.
    pub lifecycle: LifecycleConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:4221").
    pub bind_address: String,

    /// Set SO_REUSEADDR before binding.
    pub reuse_address: bool,

    /// Pending connection queue length passed to `listen(2)`.
    pub backlog: u32,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:4221".to_string(),
            reuse_address: true,
            backlog: 1024,
            max_connections: 10_000,
        }
    }
}

/// How accepted connections are handed to the connection handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dispatch {
    /// Handle each connection on the accept task before accepting the next.
    #[default]
    Inline,
    /// Spawn a task per connection.
    Spawn,
}

/// Accept loop configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AcceptConfig {
    /// Dispatch strategy for accepted connections.
    pub dispatch: Dispatch,

    /// Transient accept errors tolerated in a row before giving up.
    pub max_consecutive_errors: u32,

    /// Base delay for exponential backoff after a transient error, in milliseconds.
    pub backoff_base_ms: u64,

    /// Upper bound on the backoff delay, in milliseconds.
    pub backoff_max_ms: u64,
}

impl Default for AcceptConfig {
    fn default() -> Self {
        Self {
            dispatch: Dispatch::Inline,
            max_consecutive_errors: 16,
            backoff_base_ms: 5,
            backoff_max_ms: 1000,
        }
    }
}

/// Lifecycle configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// How long to wait for live connections to close on shutdown.
    pub shutdown_grace_secs: u64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            shutdown_grace_secs: 5,
        }
    }
}

/// Output format of the diagnostic log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Full,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Diagnostic log format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Compact,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_on_4221_with_reuse() {
        let config = ServerConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:4221");
        assert!(config.listener.reuse_address);
        assert_eq!(config.accept.dispatch, Dispatch::Inline);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:4221");
        assert_eq!(config.lifecycle.shutdown_grace_secs, 5);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [accept]
            dispatch = "spawn"

            [observability]
            log_format = "pretty"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.listener.backlog, 1024);
        assert_eq!(config.accept.dispatch, Dispatch::Spawn);
        assert_eq!(config.accept.max_consecutive_errors, 16);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn unknown_dispatch_is_rejected() {
        let result: Result<ServerConfig, _> = toml::from_str("[accept]\ndispatch = \"threads\"\n");
        assert!(result.is_err());
    }
}
