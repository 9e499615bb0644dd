//! The accept loop.
//!
//! # Responsibilities
//! - Own the bound listener for the server's whole lifetime
//! - Accept connections and dispatch them to the handler (inline or spawned)
//! - Retry transient accept errors with backoff, stop on fatal ones
//! - On shutdown: stop accepting, release the socket, drain live connections

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::config::{AcceptConfig, Dispatch, ServerConfig};
use crate::error::ServerError;
use crate::handler::ConnectionHandler;
use crate::net::{Acceptor, Connection, ConnectionTracker, Listener, ListenerError};
use crate::observability::metrics;
use crate::resilience::{calculate_backoff, classify_accept_error, AcceptErrorKind};

/// A listener plus the handler its connections go to.
pub struct Server<H, A = Listener> {
    listener: A,
    handler: Arc<H>,
    tracker: ConnectionTracker,
    accept: AcceptConfig,
    shutdown_grace: Duration,
}

impl<H: ConnectionHandler> Server<H, Listener> {
    /// Bind the configured listener.
    pub fn bind(config: &ServerConfig, handler: H) -> Result<Self, ServerError> {
        let listener = Listener::bind(&config.listener)?;
        Ok(Self::from_listener(listener, config, handler))
    }
}

impl<H: ConnectionHandler, A: Acceptor> Server<H, A> {
    /// Wrap an already bound connection source.
    pub fn from_listener(listener: A, config: &ServerConfig, handler: H) -> Self {
        Self {
            listener,
            handler: Arc::new(handler),
            tracker: ConnectionTracker::new(),
            accept: config.accept.clone(),
            shutdown_grace: Duration::from_secs(config.lifecycle.shutdown_grace_secs),
        }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Live connection tracker (shared, cheap to clone).
    pub fn tracker(&self) -> ConnectionTracker {
        self.tracker.clone()
    }

    /// Run the accept loop until `shutdown` fires or accept fails fatally.
    ///
    /// Any message on `shutdown`, including the sender going away, stops the loop.
    /// The listening socket is closed on every exit path.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> Result<(), ServerError> {
        let Server {
            listener,
            handler,
            tracker,
            accept,
            shutdown_grace,
        } = self;

        tracing::info!(
            address = %listener.local_addr().map(|a| a.to_string()).unwrap_or_default(),
            dispatch = ?accept.dispatch,
            "Accept loop starting"
        );

        let mut consecutive_errors: u32 = 0;
        loop {
            let accepted = tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    tracing::info!("Accept loop received shutdown signal");
                    break;
                }
                res = listener.accept() => res,
            };

            match accepted {
                Ok((stream, peer, permit)) => {
                    consecutive_errors = 0;
                    metrics::record_accepted();
                    let conn = Connection::new(stream, peer, tracker.track(), permit);
                    dispatch(accept.dispatch, &handler, conn).await;
                }
                Err(ListenerError::Accept(e)) => {
                    consecutive_errors += 1;
                    let kind = classify_accept_error(&e);
                    metrics::record_accept_error(kind);

                    if kind == AcceptErrorKind::Fatal
                        || consecutive_errors > accept.max_consecutive_errors
                    {
                        tracing::error!(
                            error = %e,
                            kind = kind.as_str(),
                            consecutive_errors,
                            "Accept failed, stopping"
                        );
                        return Err(ServerError::Accept {
                            attempts: consecutive_errors,
                            source: e,
                        });
                    }

                    let delay = calculate_backoff(consecutive_errors, &accept);
                    tracing::warn!(
                        error = %e,
                        consecutive_errors,
                        delay = ?delay,
                        "Transient accept error, retrying"
                    );
                    tokio::select! {
                        biased;
                        _ = shutdown.recv() => {
                            tracing::info!("Accept loop received shutdown signal");
                            break;
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        drop(listener);
        tracing::info!(
            active_connections = tracker.active_count(),
            grace = ?shutdown_grace,
            "Listener closed, draining connections"
        );
        if !tracker.drain(shutdown_grace).await {
            tracing::warn!(
                active_connections = tracker.active_count(),
                "Shutdown grace period elapsed with live connections"
            );
        }
        Ok(())
    }
}

async fn dispatch<H: ConnectionHandler>(mode: Dispatch, handler: &Arc<H>, conn: Connection) {
    tracing::debug!(
        connection_id = %conn.id(),
        peer_addr = %conn.peer_addr(),
        "Dispatching connection"
    );
    match mode {
        Dispatch::Inline => handler.handle(conn).await,
        Dispatch::Spawn => {
            let handler = Arc::clone(handler);
            tokio::spawn(async move { handler.handle(conn).await });
        }
    }
}
