//! TCP client for sending frames to the receiver.
//!
//! One exchange per connection: connect, write one frame, wait for exactly
//! one reply, close. Nothing is retried.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use bitframe_protocol::READ_BUFFER_SIZE;

use crate::error::{ClientError, ClientResult};
use crate::transmission::Transmission;

/// Client for exchanging frames with the bitframe server.
pub struct FrameClient {
    addr: SocketAddr,
    timeout: Option<Duration>,
}

impl FrameClient {
    /// Creates a new client. `timeout` bounds each connect, write and read.
    pub fn new(addr: SocketAddr, timeout: Option<Duration>) -> Self {
        Self { addr, timeout }
    }

    /// Returns the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Prepares `message` and sends its frame.
    ///
    /// Returns the transmission artifacts with the acknowledgment text.
    pub async fn transmit(&self, message: &str) -> ClientResult<(Transmission, String)> {
        let transmission = Transmission::prepare(message)?;
        let ack = self.send_frame(transmission.frame_bytes()).await?;
        Ok((transmission, ack))
    }

    /// Sends one frame and returns the server's reply verbatim.
    pub async fn send_frame(&self, frame: &[u8]) -> ClientResult<String> {
        debug!(addr = %self.addr, bytes = frame.len(), "connecting to server");

        let mut stream = self
            .timed("connecting", TcpStream::connect(self.addr))
            .await
            .map_err(|e| match e {
                ClientError::Io(err) => self.connect_error(err),
                other => other,
            })?;

        self.timed("sending frame", async {
            stream.write_all(frame).await?;
            stream.flush().await
        })
        .await?;

        debug!("frame sent, waiting for acknowledgment");

        let mut reply = vec![0u8; READ_BUFFER_SIZE];
        let n = self
            .timed("reading acknowledgment", stream.read(&mut reply))
            .await?;
        if n == 0 {
            return Err(ClientError::Protocol(
                "server closed the connection without an acknowledgment".into(),
            ));
        }

        let ack = String::from_utf8_lossy(&reply[..n]).into_owned();
        debug!(ack = %ack, "acknowledgment received");
        Ok(ack)
    }

    fn connect_error(&self, err: io::Error) -> ClientError {
        if err.kind() == io::ErrorKind::ConnectionRefused {
            ClientError::ConnectionRefused { addr: self.addr }
        } else {
            ClientError::Connection(format!("failed to connect to {}: {}", self.addr, err))
        }
    }

    async fn timed<T>(
        &self,
        operation: &str,
        fut: impl Future<Output = io::Result<T>>,
    ) -> ClientResult<T> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| {
                    ClientError::Timeout(format!(
                        "{} timed out after {}ms",
                        operation,
                        limit.as_millis()
                    ))
                })?
                .map_err(ClientError::Io),
            None => Ok(fut.await?),
        }
    }
}
