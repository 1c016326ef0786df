//! Server command: runs the receiver in the foreground.
//!
//! Serves one client at a time until Ctrl-C.

use tracing::{info, warn};

use bitframe_server::{Connection, FrameServer};

use crate::config::{LinkSettings, ServerSettings};
use crate::error::{ClientError, ClientResult};

/// Binds the configured address and answers frames until interrupted.
pub async fn run(link: &LinkSettings, settings: &ServerSettings) -> ClientResult<()> {
    let addr = link.addr().map_err(ClientError::Config)?;
    let server = FrameServer::bind(settings.to_server_config(addr)).await?;

    server
        .run_until_shutdown(Connection::serve, shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
}
