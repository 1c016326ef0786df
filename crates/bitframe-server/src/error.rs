//! Server error types.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// IO error on an established connection.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Protocol error (timeouts, framing).
    #[error("Protocol error: {0}")]
    Protocol(#[from] bitframe_protocol::ProtocolError),

    /// The listen address could not be bound.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}
