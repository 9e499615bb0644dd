//! Shared utilities for integration tests.

use std::net::SocketAddr;

use tcp_acceptor::config::{Dispatch, ServerConfig};
use tcp_acceptor::handler::handler_fn;
use tcp_acceptor::net::{Connection, ConnectionTracker};
use tcp_acceptor::{Server, ServerError, Shutdown};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A server running on a loopback port that reports every accepted peer.
pub struct RecordingServer {
    pub addr: SocketAddr,
    pub accepted: mpsc::UnboundedReceiver<SocketAddr>,
    pub tracker: ConnectionTracker,
    pub shutdown: Shutdown,
    pub task: JoinHandle<Result<(), ServerError>>,
}

impl RecordingServer {
    /// Trigger shutdown and wait for the accept loop to finish.
    pub async fn stop(self) -> Result<(), ServerError> {
        self.shutdown.trigger();
        self.task.await.expect("server task panicked")
    }
}

pub fn loopback_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.lifecycle.shutdown_grace_secs = 1;
    config
}

/// Start a server whose handler records the peer address and drops the connection.
pub async fn start_recording_server(dispatch: Dispatch) -> RecordingServer {
    let mut config = loopback_config();
    config.accept.dispatch = dispatch;

    let (tx, accepted) = mpsc::unbounded_channel();
    let server = Server::bind(
        &config,
        handler_fn(move |conn: Connection| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(conn.peer_addr());
            }
        }),
    )
    .expect("bind loopback");

    let addr = server.local_addr().unwrap();
    let tracker = server.tracker();
    let shutdown = Shutdown::new();
    let task = tokio::spawn(server.run(shutdown.subscribe()));

    RecordingServer {
        addr,
        accepted,
        tracker,
        shutdown,
        task,
    }
}
