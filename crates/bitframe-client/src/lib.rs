//! CLI, TCP sender, configuration
//!
//! This crate provides the `bitframe` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod socket;
pub mod transmission;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
pub use socket::FrameClient;
pub use transmission::Transmission;
