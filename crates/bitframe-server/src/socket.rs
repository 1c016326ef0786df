//! TCP listener and connection loop.
//!
//! The server owns one connection at a time:
//!
//! ```text
//! Listening --accept--> Connected --(frame -> ack)*--> Disconnected --> Listening
//! ```
//!
//! A peer closing the stream, or any transport error on it, only ends that
//! connection. The accept loop keeps going until the process stops or the
//! shutdown future passed to [`FrameServer::run_until_shutdown`] completes.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, instrument, warn};

use bitframe_protocol::{Ack, FrameAssembler, ProtocolError};

use crate::config::{ReadMode, ServerConfig};
use crate::error::{ServerError, ServerResult};
use crate::handler::handle_frame;

/// TCP server receiving frames.
pub struct FrameServer {
    /// Server configuration.
    config: ServerConfig,
    /// TCP listener.
    listener: TcpListener,
}

impl FrameServer {
    /// Binds to the address in the configuration.
    pub async fn bind(config: ServerConfig) -> ServerResult<Self> {
        let listener =
            TcpListener::bind(config.addr)
                .await
                .map_err(|source| ServerError::Bind {
                    addr: config.addr,
                    source,
                })?;

        info!(
            addr = %listener.local_addr()?,
            read_mode = %config.read_mode,
            "Server listening"
        );

        Ok(Self { config, listener })
    }

    /// Returns the bound address (useful when binding port 0).
    pub fn local_addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts a single connection.
    pub async fn accept(&self) -> ServerResult<Connection> {
        let (stream, peer) = self.listener.accept().await?;
        info!(peer = %peer, "Connected");

        Ok(Connection {
            stream,
            peer,
            read_mode: self.config.read_mode,
            read_buffer: vec![0u8; self.config.read_buffer_size],
            assembler: FrameAssembler::new(),
            timeout: self.config.io_timeout,
            eof: false,
        })
    }

    /// Runs the accept loop, handing each connection to `handler`.
    ///
    /// The handler is awaited before the next connection is accepted, so at
    /// most one client is served at a time.
    pub async fn run<F, Fut>(&self, handler: F) -> ServerResult<()>
    where
        F: Fn(Connection) -> Fut,
        Fut: Future<Output = ()>,
    {
        loop {
            debug!("Waiting for client connection");
            match self.accept().await {
                Ok(connection) => handler(connection).await,
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                    // Continue accepting despite errors
                }
            }
        }
    }

    /// Runs the accept loop until `shutdown` completes.
    pub async fn run_until_shutdown<F, Fut, S>(&self, handler: F, shutdown: S) -> ServerResult<()>
    where
        F: Fn(Connection) -> Fut,
        Fut: Future<Output = ()>,
        S: Future<Output = ()>,
    {
        tokio::select! {
            result = self.run(handler) => result,
            _ = shutdown => {
                info!("Shutdown signal received");
                Ok(())
            }
        }
    }
}

/// Unit of work read from a connection.
#[derive(Debug)]
pub enum Inbound {
    /// Bytes to be processed as one frame.
    Frame(Vec<u8>),
    /// Bytes that could not be cut into a clean frame.
    Rejected(ProtocolError),
}

/// A client connection.
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    read_mode: ReadMode,
    read_buffer: Vec<u8>,
    assembler: FrameAssembler,
    timeout: Option<Duration>,
    eof: bool,
}

impl Connection {
    /// Reads the next inbound unit.
    ///
    /// Returns `Ok(None)` once the peer has closed the stream.
    pub async fn next_inbound(&mut self) -> ServerResult<Option<Inbound>> {
        match self.read_mode {
            ReadMode::Chunk => {
                let n = self.read_chunk().await?;
                if n == 0 {
                    return Ok(None);
                }
                Ok(Some(Inbound::Frame(self.read_buffer[..n].to_vec())))
            }
            ReadMode::Delimited => loop {
                if let Some(result) = self.assembler.next_frame() {
                    return Ok(Some(match result {
                        Ok(frame) => Inbound::Frame(frame),
                        Err(e) => Inbound::Rejected(e),
                    }));
                }
                if self.eof {
                    return Ok(self.assembler.finish().map(Inbound::Rejected));
                }

                let n = self.read_chunk().await?;
                if n == 0 {
                    self.eof = true;
                } else {
                    self.assembler.push(&self.read_buffer[..n]);
                }
            },
        }
    }

    /// Writes an acknowledgment.
    pub async fn write_ack(&mut self, ack: Ack) -> ServerResult<()> {
        let timeout = self.timeout;
        let stream = &mut self.stream;
        with_timeout(timeout, "write acknowledgment", async {
            stream.write_all(ack.as_bytes()).await?;
            stream.flush().await
        })
        .await
    }

    async fn read_chunk(&mut self) -> ServerResult<usize> {
        let timeout = self.timeout;
        let (stream, buffer) = (&mut self.stream, &mut self.read_buffer);
        with_timeout(timeout, "read frame", stream.read(buffer)).await
    }

    /// Answers frames until the peer disconnects or the transport fails.
    #[instrument(name = "connection", skip(self), fields(peer = %self.peer))]
    pub async fn serve(mut self) {
        let mut frames = 0u64;

        loop {
            let inbound = match self.next_inbound().await {
                Ok(Some(inbound)) => inbound,
                Ok(None) => {
                    info!(frames, "Client disconnected");
                    break;
                }
                Err(e) => {
                    error!(error = %e, frames, "Connection failed");
                    break;
                }
            };

            let ack = match inbound {
                Inbound::Frame(frame) => handle_frame(&frame).ack,
                Inbound::Rejected(e) => {
                    warn!(error = %e, "Rejecting unframed bytes");
                    Ack::FlagSyncFailure
                }
            };
            frames += 1;

            if let Err(e) = self.write_ack(ack).await {
                error!(error = %e, "Failed to send acknowledgment");
                break;
            }
            debug!(ack = %ack, "Acknowledgment sent");
        }
    }
}

async fn with_timeout<T>(
    timeout: Option<Duration>,
    operation: &str,
    fut: impl Future<Output = io::Result<T>>,
) -> ServerResult<T> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| ProtocolError::timeout(operation))?
            .map_err(ServerError::from),
        None => Ok(fut.await?),
    }
}
