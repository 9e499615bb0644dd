//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! accept() fails:
//!     → classify_accept_error (transient or fatal)
//!     → Transient: backoff.rs delay, retry, count consecutive failures
//!     → Fatal (or error budget spent): stop the accept loop
//! ```
//!
//! Bind errors never reach this module; they are always fatal.

pub mod backoff;

use std::io;

pub use backoff::calculate_backoff;

/// Outcome of classifying an accept error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptErrorKind {
    /// The listening socket is still usable; try again.
    Transient,
    /// The listening socket is broken; give up.
    Fatal,
}

impl AcceptErrorKind {
    /// Metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            AcceptErrorKind::Transient => "transient",
            AcceptErrorKind::Fatal => "fatal",
        }
    }
}

/// Descriptor, memory or socket-buffer exhaustion reported by `accept(2)`.
#[cfg(unix)]
fn is_resource_exhaustion(err: &io::Error) -> bool {
    matches!(
        err.raw_os_error(),
        Some(libc::ENOMEM | libc::ENFILE | libc::EMFILE | libc::ENOBUFS)
    )
}

#[cfg(not(unix))]
fn is_resource_exhaustion(_err: &io::Error) -> bool {
    false
}

/// Decide whether an accept error leaves the listener usable.
///
/// Errors caused by a single peer (reset/aborted before accept completed) and
/// temporary descriptor or buffer exhaustion are transient. Everything else
/// (bad descriptor, invalid state, permission) is fatal.
pub fn classify_accept_error(err: &io::Error) -> AcceptErrorKind {
    match err.kind() {
        io::ErrorKind::ConnectionAborted
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionRefused
        | io::ErrorKind::Interrupted
        | io::ErrorKind::TimedOut
        | io::ErrorKind::WouldBlock => AcceptErrorKind::Transient,
        _ if is_resource_exhaustion(err) => AcceptErrorKind::Transient,
        _ => AcceptErrorKind::Fatal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peer_caused_errors_are_transient() {
        for kind in [
            io::ErrorKind::ConnectionAborted,
            io::ErrorKind::ConnectionReset,
            io::ErrorKind::Interrupted,
            io::ErrorKind::WouldBlock,
        ] {
            assert_eq!(
                classify_accept_error(&io::Error::from(kind)),
                AcceptErrorKind::Transient,
                "{kind:?}"
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn resource_exhaustion_is_transient() {
        for errno in [libc::EMFILE, libc::ENFILE, libc::ENOBUFS, libc::ENOMEM] {
            let err = io::Error::from_raw_os_error(errno);
            assert_eq!(classify_accept_error(&err), AcceptErrorKind::Transient, "errno {errno}");
        }
    }

    #[test]
    fn other_errors_are_fatal() {
        assert_eq!(
            classify_accept_error(&io::Error::from(io::ErrorKind::PermissionDenied)),
            AcceptErrorKind::Fatal
        );
        assert_eq!(
            classify_accept_error(&io::Error::new(io::ErrorKind::Other, "listener gone")),
            AcceptErrorKind::Fatal
        );
    }

    #[cfg(unix)]
    #[test]
    fn bad_descriptor_is_fatal() {
        assert_eq!(
            classify_accept_error(&io::Error::from_raw_os_error(libc::EBADF)),
            AcceptErrorKind::Fatal
        );
    }
}
