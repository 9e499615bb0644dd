//! tcp-acceptor
//!
//! Listens on 0.0.0.0:4221 (override with a TOML file named by
//! `TCP_ACCEPTOR_CONFIG`), accepts connections one after another and prints
//! `Accepted new connection from: <peer ip>` for each.
//!
//! ```text
//!     Client ──TCP──▶ net::Listener ──▶ server (accept loop) ──▶ handler
//!                      (reuseaddr,        (backoff on            (announce,
//!                       slot limit)        transient errors)      drop)
//! ```
//!
//! Standard output carries the banner, acceptance lines and a final
//! `IOException: ...` line on fatal socket failure. Diagnostics go to standard error.

use std::process::ExitCode;

use tcp_acceptor::config;
use tcp_acceptor::lifecycle::{startup, Shutdown};
use tcp_acceptor::observability::logging;
use tcp_acceptor::ServerError;

const BANNER: &str = "Logs from your program will appear here!";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    println!("{BANNER}");

    let config = match config::load_from_env() {
        Ok(config) => config,
        Err(e) => {
            println!("{}", ServerError::from(e).report_line());
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.observability) {
        eprintln!("failed to initialize logging: {e}");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        reuse_address = config.listener.reuse_address,
        dispatch = ?config.accept.dispatch,
        "tcp-acceptor v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    match startup::run(config, Shutdown::new()).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Server stopped");
            println!("{}", e.report_line());
            ExitCode::FAILURE
        }
    }
}
