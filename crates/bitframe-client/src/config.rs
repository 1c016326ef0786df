//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/bitframe/config.toml` by default:
//!
//! ```toml
//! [link]
//! host = "127.0.0.1"
//! port = 666
//! timeout = 5
//!
//! [server]
//! read_mode = "chunk"
//! read_buffer_size = 1024
//!
//! [log]
//! format = "compact"
//! ```

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use bitframe_core::TracingOutputFormat;
use bitframe_protocol::{DEFAULT_HOST, DEFAULT_PORT, READ_BUFFER_SIZE};
use bitframe_server::{ReadMode, ServerConfig};

/// Configuration for the bitframe client and the server it can start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Address and timeout shared by both ends.
    pub link: LinkSettings,

    /// Receiver settings used by `bitframe server`.
    pub server: ServerSettings,

    /// Log output settings.
    pub log: LogSettings,
}

/// Log output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Log line format (pretty, compact, json).
    pub format: TracingOutputFormat,
}

/// Where the two ends meet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkSettings {
    /// Server host name or IP address.
    pub host: String,

    /// Server TCP port.
    pub port: u16,

    /// Client timeout in seconds for connect, send and reply (0 disables).
    pub timeout: u64,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout: 5,
        }
    }
}

impl LinkSettings {
    /// Applies command-line overrides.
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        timeout: Option<u64>,
    ) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(timeout) = timeout {
            self.timeout = timeout;
        }
        self
    }

    /// Resolves the configured host and port.
    pub fn addr(&self) -> Result<SocketAddr, String> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| format!("cannot resolve {}:{}: {}", self.host, self.port, e))?
            .next()
            .ok_or_else(|| format!("no address found for {}:{}", self.host, self.port))
    }

    /// Returns the client timeout, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }
}

/// Receiver settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// How incoming bytes are split into frames.
    pub read_mode: ReadMode,

    /// Maximum bytes per socket read.
    pub read_buffer_size: usize,

    /// Per-call IO timeout in seconds; unset blocks indefinitely.
    pub io_timeout: Option<u64>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            read_mode: ReadMode::default(),
            read_buffer_size: READ_BUFFER_SIZE,
            io_timeout: None,
        }
    }
}

impl ServerSettings {
    /// Applies command-line overrides.
    pub fn with_overrides(mut self, read_mode: Option<ReadMode>, io_timeout: Option<u64>) -> Self {
        if let Some(mode) = read_mode {
            self.read_mode = mode;
        }
        if io_timeout.is_some() {
            self.io_timeout = io_timeout;
        }
        self
    }

    /// Builds the server configuration for `addr`.
    pub fn to_server_config(&self, addr: SocketAddr) -> ServerConfig {
        ServerConfig::new(addr)
            .with_read_mode(self.read_mode)
            .with_read_buffer_size(self.read_buffer_size)
            .with_io_timeout(self.io_timeout.map(Duration::from_secs))
    }
}

impl ClientConfig {
    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bitframe")
    }
}
