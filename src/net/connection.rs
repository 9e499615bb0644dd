//! Accepted connections and lifecycle tracking.
//!
//! # Responsibilities
//! - Generate unique connection IDs for tracing
//! - Count live connections so shutdown can drain them
//! - Bundle the stream with everything that must be released alongside it

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::watch;

use crate::net::listener::ConnectionPermit;
use crate::observability::metrics;

/// Global counter for connection IDs. Only uniqueness matters, so relaxed ordering is enough.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Tracks live connections for graceful shutdown.
///
/// The count lives in a watch channel so `drain` can sleep until it reaches zero
/// instead of polling.
#[derive(Debug, Clone)]
pub struct ConnectionTracker {
    active: Arc<watch::Sender<u64>>,
}

impl ConnectionTracker {
    /// Create a new connection tracker.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self {
            active: Arc::new(tx),
        }
    }

    /// Record a new live connection. Returns a guard that decrements on drop.
    pub fn track(&self) -> ConnectionGuard {
        let mut now = 0;
        self.active.send_modify(|count| {
            *count += 1;
            now = *count;
        });
        metrics::set_active_connections(now);
        ConnectionGuard {
            active: Arc::clone(&self.active),
            id: ConnectionId::new(),
        }
    }

    /// Get current live connection count.
    pub fn active_count(&self) -> u64 {
        *self.active.borrow()
    }

    /// Wait until every tracked connection is gone, or `grace` elapses.
    ///
    /// Returns `true` if the count reached zero in time.
    pub async fn drain(&self, grace: Duration) -> bool {
        let mut rx = self.active.subscribe();
        let idle = async move { rx.wait_for(|count| *count == 0).await.map(|_| ()) };
        matches!(tokio::time::timeout(grace, idle).await, Ok(Ok(())))
    }
}

impl Default for ConnectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that tracks a connection's lifetime.
/// Decrements the live count when dropped.
#[derive(Debug)]
pub struct ConnectionGuard {
    active: Arc<watch::Sender<u64>>,
    id: ConnectionId,
}

impl ConnectionGuard {
    /// Get this connection's ID.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let mut now = 0;
        self.active.send_modify(|count| {
            *count = count.saturating_sub(1);
            now = *count;
        });
        metrics::set_active_connections(now);
        tracing::trace!(connection_id = %self.id, "Connection closed");
    }
}

/// An accepted connection.
///
/// Owns the socket, its tracking guard and its connection slot; dropping it
/// closes the socket and releases both.
#[derive(Debug)]
pub struct Connection {
    _stream: TcpStream,
    peer_addr: SocketAddr,
    guard: ConnectionGuard,
    _permit: ConnectionPermit,
}

impl Connection {
    pub fn new(
        stream: TcpStream,
        peer_addr: SocketAddr,
        guard: ConnectionGuard,
        permit: ConnectionPermit,
    ) -> Self {
        Self {
            _stream: stream,
            peer_addr,
            guard,
            _permit: permit,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.guard.id()
    }

    /// The remote endpoint's address.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }
}
