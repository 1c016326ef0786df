//! Client error types.

use std::net::SocketAddr;

use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Nothing is listening at the server address.
    #[error("connection refused by {addr}: is the server running?")]
    ConnectionRefused { addr: SocketAddr },

    /// Connection to server failed for another reason.
    #[error("connection error: {0}")]
    Connection(String),

    /// The server did not answer as expected.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The server answered with something other than the success ack.
    #[error("frame rejected by server: {ack}")]
    Rejected { ack: String },

    /// Request timed out.
    #[error("timeout: {0}")]
    Timeout(String),

    /// The message cannot be encoded.
    #[error("cannot encode message: {0}")]
    Encoding(#[from] bitframe_core::CoreError),

    /// There is nothing to send.
    #[error("message is empty")]
    EmptyMessage,

    /// The receiver could not start or stopped with an error.
    #[error("server error: {0}")]
    Server(#[from] bitframe_server::ServerError),
}
