//! Per-connection handling.
//!
//! The accept loop hands every [`Connection`] to a [`ConnectionHandler`]. The
//! handler owns the connection from then on; dropping it closes the socket.

use std::future::Future;
use std::io::{self, Write};
use std::net::IpAddr;
use std::sync::Mutex;

use futures_util::future::{BoxFuture, FutureExt};

use crate::net::Connection;

/// Work done for each accepted connection.
pub trait ConnectionHandler: Send + Sync + 'static {
    fn handle(&self, conn: Connection) -> BoxFuture<'static, ()>;
}

/// The line announced on standard output for every accepted connection.
/// Only the peer's IP address is shown; the ephemeral port is left out.
pub fn acceptance_line(peer: IpAddr) -> String {
    format!("Accepted new connection from: {peer}")
}

/// Announces each connection's peer IP and then drops the connection
/// without reading or writing anything.
pub struct AnnounceHandler<W> {
    out: Mutex<W>,
}

impl AnnounceHandler<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + 'static> AnnounceHandler<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    fn announce(&self, peer: IpAddr) -> io::Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "output lock poisoned"))?;
        writeln!(out, "{}", acceptance_line(peer))?;
        out.flush()
    }
}

impl<W: Write + Send + 'static> ConnectionHandler for AnnounceHandler<W> {
    fn handle(&self, conn: Connection) -> BoxFuture<'static, ()> {
        let peer = conn.peer_addr();
        tracing::info!(connection_id = %conn.id(), peer_addr = %peer, "Accepted new connection");
        if let Err(e) = self.announce(peer.ip()) {
            tracing::warn!(error = %e, peer_addr = %peer, "Failed to announce connection");
        }
        drop(conn);
        futures_util::future::ready(()).boxed()
    }
}

/// Adapts an async closure into a [`ConnectionHandler`].
pub struct HandlerFn<F> {
    f: F,
}

/// Build a handler from `Fn(Connection) -> impl Future<Output = ()>`.
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(Connection) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    HandlerFn { f }
}

impl<F, Fut> ConnectionHandler for HandlerFn<F>
where
    F: Fn(Connection) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn handle(&self, conn: Connection) -> BoxFuture<'static, ()> {
        (self.f)(conn).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ListenerConfig;
    use crate::net::{ConnectionTracker, Listener};
    use tokio::io::AsyncReadExt;
    use std::net::SocketAddr;
    use tokio::net::TcpStream;

    async fn accept_one(listener: &Listener, tracker: &ConnectionTracker) -> (Connection, TcpStream) {
        let client = TcpStream::connect(listener.local_addr().unwrap()).await.unwrap();
        let (stream, peer, permit) = listener.accept().await.unwrap();
        (Connection::new(stream, peer, tracker.track(), permit), client)
    }

    fn loopback() -> ListenerConfig {
        ListenerConfig {
            bind_address: "127.0.0.1:0".into(),
            ..ListenerConfig::default()
        }
    }

    #[test]
    fn acceptance_line_format() {
        let peer: SocketAddr = "127.0.0.1:50000".parse().unwrap();
        assert_eq!(acceptance_line(peer.ip()), "Accepted new connection from: 127.0.0.1");

        let peer: SocketAddr = "[::1]:50000".parse().unwrap();
        assert_eq!(acceptance_line(peer.ip()), "Accepted new connection from: ::1");
    }

    #[tokio::test]
    async fn announce_writes_line_and_closes_without_sending() {
        let listener = Listener::bind(&loopback()).unwrap();
        let tracker = ConnectionTracker::new();
        let handler = AnnounceHandler::new(Vec::new());

        let (conn, mut client) = accept_one(&listener, &tracker).await;
        let peer = conn.peer_addr();
        handler.handle(conn).await;

        let written = String::from_utf8(handler.out.lock().unwrap().clone()).unwrap();
        assert_eq!(written, format!("Accepted new connection from: {}\n", peer.ip()));
        assert_eq!(tracker.active_count(), 0);

        // Server closed its end with no payload.
        let mut buf = [0u8; 16];
        assert_eq!(client.read(&mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn handler_fn_receives_connection() {
        let listener = Listener::bind(&loopback()).unwrap();
        let tracker = ConnectionTracker::new();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let handler = handler_fn(move |conn: Connection| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(conn.peer_addr());
            }
        });

        let (conn, client) = accept_one(&listener, &tracker).await;
        handler.handle(conn).await;

        assert_eq!(rx.recv().await.unwrap(), client.local_addr().unwrap());
    }
}
