//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! $TCP_ACCEPTOR_CONFIG (TOML, optional)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → handed by value to the server at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults; no file means the built-in port 4221 setup
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{
    AcceptConfig, Dispatch, LifecycleConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    ServerConfig,
};
