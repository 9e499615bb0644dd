//! Top-level error type.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::net::ListenerError;

/// Any error that stops the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    /// Accept failed fatally, or transient failures exceeded the budget.
    #[error("accept failed after {attempts} consecutive error(s): {source}")]
    Accept {
        attempts: u32,
        #[source]
        source: io::Error,
    },

    #[error("metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

impl ServerError {
    /// The fixed-prefix line printed on standard output before exiting.
    ///
    /// Socket failures print only the operating system's message, e.g.
    /// `IOException: Address already in use`. Context such as the bind address
    /// or the attempt count goes to the diagnostic log instead.
    pub fn report_line(&self) -> String {
        match self {
            ServerError::Listener(ListenerError::Bind { source, .. })
            | ServerError::Listener(ListenerError::Accept(source))
            | ServerError::Accept { source, .. } => format!("IOException: {}", os_message(source)),
            ServerError::Listener(ListenerError::Closed) => format!("IOException: {self}"),
            ServerError::Config(_) => format!("Config error: {self}"),
            ServerError::Metrics(_) => format!("Metrics error: {self}"),
        }
    }
}

/// The error's message without the ` (os error N)` suffix std appends.
fn os_message(err: &io::Error) -> String {
    let text = err.to_string();
    if let Some(code) = err.raw_os_error() {
        if let Some(message) = text.strip_suffix(&format!(" (os error {code})")) {
            return message.to_owned();
        }
    }
    text
}
