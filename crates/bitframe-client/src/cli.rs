//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use bitframe_core::tracing::{TracingConfig, TracingOutputFormat};
use bitframe_server::ReadMode;

use crate::config::{ClientConfig, LinkSettings};

/// bitframe - bit-stuffed framing over TCP
#[derive(Debug, Parser)]
#[command(name = "bitframe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "BITFRAME_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Log format (pretty, compact, json)
    #[arg(long, env = "BITFRAME_LOG_FORMAT")]
    pub log_format: Option<TracingOutputFormat>,

    // --- Connection flags ---
    /// Server host
    #[arg(long, env = "BITFRAME_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "BITFRAME_PORT")]
    pub port: Option<u16>,

    /// Client timeout in seconds (0 disables)
    #[arg(long)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Returns the link settings from the config file with flags applied.
    pub fn link_settings(&self, config: &ClientConfig) -> LinkSettings {
        config
            .link
            .clone()
            .with_overrides(self.host.clone(), self.port, self.timeout)
    }

    /// Picks the tracing profile for the command, in the configured format.
    pub fn tracing_config(&self, config: &ClientConfig) -> TracingConfig {
        let profile = if self.debug {
            TracingConfig::cli_debug()
        } else if matches!(self.command, Command::Server { .. }) {
            TracingConfig::server()
        } else {
            TracingConfig::default()
        };
        profile.with_format(self.log_format.unwrap_or(config.log.format))
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encode, stuff and frame a message, then send it to the server
    Send {
        /// Message to transmit
        message: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Run the receiving server in the foreground
    Server {
        /// How received bytes are split into frames (chunk, delimited)
        #[arg(long)]
        read_mode: Option<ReadMode>,

        /// Per-call IO timeout in seconds
        #[arg(long)]
        io_timeout: Option<u64>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_send() {
        let cli = Cli::try_parse_from(["bitframe", "--port", "7000", "send", "hello"]).unwrap();
        match cli.command {
            Command::Send { ref message, json } => {
                assert_eq!(message, "hello");
                assert!(!json);
            }
            _ => panic!("expected send"),
        }

        let link = cli.link_settings(&ClientConfig::default());
        assert_eq!(link.port, 7000);
        assert_eq!(link.host, "127.0.0.1");
    }

    #[test]
    fn parse_server_read_mode() {
        let cli =
            Cli::try_parse_from(["bitframe", "server", "--read-mode", "delimited"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Server {
                read_mode: Some(ReadMode::Delimited),
                io_timeout: None
            }
        ));

        assert!(Cli::try_parse_from(["bitframe", "server", "--read-mode", "lines"]).is_err());
    }

    #[test]
    fn log_format_flag_overrides_config() {
        let mut config = ClientConfig::default();
        config.log.format = TracingOutputFormat::Pretty;

        let cli = Cli::try_parse_from(["bitframe", "server"]).unwrap();
        let tracing = cli.tracing_config(&config);
        assert_eq!(tracing.output_format, TracingOutputFormat::Pretty);
        assert!(tracing.include_span_events);

        let cli =
            Cli::try_parse_from(["bitframe", "--log-format", "json", "-v", "send", "A"]).unwrap();
        let tracing = cli.tracing_config(&config);
        assert_eq!(tracing.output_format, TracingOutputFormat::Json);
        assert!(tracing.include_location);

        assert!(Cli::try_parse_from(["bitframe", "--log-format", "xml", "send", "A"]).is_err());
    }

    #[test]
    fn send_requires_message() {
        assert!(Cli::try_parse_from(["bitframe", "send"]).is_err());
    }
}
