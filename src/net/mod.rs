//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (slot permit, accept)
//!     → connection.rs (id, live-count guard)
//!     → Hand off to the connection handler
//! ```
//!
//! # Design Decisions
//! - SO_REUSEADDR is set before bind so restarts rebind immediately
//! - Bounded connection slots prevent descriptor exhaustion
//! - Every resource tied to a connection is released when it is dropped

pub mod connection;
pub mod listener;

pub use connection::{Connection, ConnectionGuard, ConnectionId, ConnectionTracker};
pub use listener::{Acceptor, ConnectionPermit, Listener, ListenerError};
