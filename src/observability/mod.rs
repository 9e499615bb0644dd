//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Listener, accept loop, connection tracker produce:
//!     → logging.rs (structured tracing events on stderr)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → Terminal or log collector reading stderr
//!     → Metrics endpoint (Prometheus scrape), when enabled
//! ```

pub mod logging;
pub mod metrics;
