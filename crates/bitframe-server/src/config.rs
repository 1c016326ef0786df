//! Server configuration.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use bitframe_protocol::{DEFAULT_PORT, READ_BUFFER_SIZE};

/// How incoming bytes are split into frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadMode {
    /// Every non-empty read is taken as exactly one frame.
    #[default]
    Chunk,
    /// Bytes are buffered and frames are cut at flag boundaries.
    Delimited,
}

impl FromStr for ReadMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chunk" => Ok(Self::Chunk),
            "delimited" => Ok(Self::Delimited),
            other => Err(format!(
                "unknown read mode '{other}' (expected 'chunk' or 'delimited')"
            )),
        }
    }
}

impl fmt::Display for ReadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chunk => f.write_str("chunk"),
            Self::Delimited => f.write_str("delimited"),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on.
    pub addr: SocketAddr,

    /// Frame splitting strategy.
    pub read_mode: ReadMode,

    /// Maximum bytes taken from the socket per read.
    pub read_buffer_size: usize,

    /// Per-call read/write timeout. `None` blocks indefinitely.
    pub io_timeout: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            read_mode: ReadMode::default(),
            read_buffer_size: READ_BUFFER_SIZE,
            io_timeout: None,
        }
    }
}

impl ServerConfig {
    /// Creates a new server configuration listening on `addr`.
    pub fn new(addr: impl Into<SocketAddr>) -> Self {
        Self {
            addr: addr.into(),
            ..Default::default()
        }
    }

    /// Builder: set read mode.
    pub fn with_read_mode(mut self, mode: ReadMode) -> Self {
        self.read_mode = mode;
        self
    }

    /// Builder: set read buffer size (at least one byte).
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }

    /// Builder: set per-call IO timeout.
    pub fn with_io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.io_timeout = timeout;
        self
    }
}

/// Returns the default listen address: loopback on the shared port.
pub fn default_addr() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT)
}
