//! Receiver: TCP listener, connection loop, frame handler.
//!
//! # Example
//!
//! ```rust,no_run
//! use bitframe_server::{Connection, FrameServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = FrameServer::bind(ServerConfig::default()).await?;
//!     server.run(Connection::serve).await?;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod handler;
mod socket;

pub use config::{ReadMode, ServerConfig, default_addr};
pub use error::{ServerError, ServerResult};
pub use handler::{FrameReport, Recovered, handle_frame};
pub use socket::{Connection, FrameServer, Inbound};
