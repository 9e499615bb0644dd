//! TCP accept-loop server library.
//!
//! Binds a listening socket (port 4221 by default, SO_REUSEADDR on), accepts
//! connections and announces each peer address. Connections are handed to a
//! [`ConnectionHandler`]; the default one reads and writes nothing.

pub mod config;
pub mod error;
pub mod handler;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod resilience;
pub mod server;

pub use config::ServerConfig;
pub use error::ServerError;
pub use handler::{AnnounceHandler, ConnectionHandler};
pub use lifecycle::Shutdown;
pub use server::Server;
