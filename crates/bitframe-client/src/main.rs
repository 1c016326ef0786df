//! bitframe CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use bitframe_client::cli::{Cli, Command, ConfigAction};
use bitframe_client::commands;
use bitframe_client::config::ClientConfig;
use bitframe_client::error::{ClientError, ClientResult};
use bitframe_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config = if let Some(ref path) = cli.config {
        ClientConfig::load_from(path).map_err(ClientError::Config)?
    } else {
        ClientConfig::load().map_err(ClientError::Config)?
    };

    if let Err(e) = init_tracing(cli.tracing_config(&config)) {
        eprintln!("warning: {}", e);
    }

    let link = cli.link_settings(&config);

    match cli.command {
        Command::Send { ref message, json } => commands::send::run(&link, message, json).await,
        Command::Server {
            read_mode,
            io_timeout,
        } => {
            let settings = config.server.clone().with_overrides(read_mode, io_timeout);
            commands::server::run(&link, &settings).await
        }
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Path => commands::config::path(),
        },
    }
}
