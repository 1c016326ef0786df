//! Send command: encode, stuff, frame and transmit one message.

use std::net::SocketAddr;

use serde::Serialize;
use tracing::{info, warn};

use bitframe_protocol::{Ack, FLAG, READ_BUFFER_SIZE};

use crate::config::LinkSettings;
use crate::error::{ClientError, ClientResult};
use crate::socket::FrameClient;
use crate::transmission::Transmission;

/// Sends `message` and prints every pipeline artifact plus the reply.
///
/// Transport failures and rejected frames are printed in the report and
/// then returned, so the process exits with an error status.
pub async fn run(link: &LinkSettings, message: &str, json: bool) -> ClientResult<()> {
    let addr = link.addr().map_err(ClientError::Config)?;
    let transmission = Transmission::prepare(message)?;
    if transmission.exceeds_single_read() {
        warn!(
            frame = transmission.frame_bytes().len(),
            limit = READ_BUFFER_SIZE,
            "Frame is longer than one server read; start the server with --read-mode delimited"
        );
    }

    let client = FrameClient::new(addr, link.timeout());
    info!(addr = %client.addr(), "Attempting connection");
    let outcome = client.send_frame(transmission.frame_bytes()).await;

    let output = if json {
        render_json(&transmission, addr, outcome.as_deref())?
    } else {
        render(&transmission, addr, outcome.as_deref())
    };
    println!("{}", output);

    check_ack(&outcome?).map(|_| ())
}

/// Accepts only the success acknowledgment.
pub fn check_ack(reply: &str) -> ClientResult<Ack> {
    match Ack::from_wire(reply.as_bytes()) {
        Some(ack) if ack.is_success() => Ok(ack),
        _ => Err(ClientError::Rejected {
            ack: reply.to_string(),
        }),
    }
}

/// Renders the transmission for a terminal.
pub fn render(
    transmission: &Transmission,
    addr: SocketAddr,
    outcome: Result<&str, &ClientError>,
) -> String {
    let (status, ack) = match outcome {
        Ok(ack) => (format!("SENT: Frame transmitted to {addr}"), ack.to_string()),
        Err(ClientError::ConnectionRefused { .. }) => (
            "ERROR: Connection refused.".to_string(),
            "Server is not running. Start `bitframe server` first.".to_string(),
        ),
        Err(e) => (format!("ERROR: {e}"), "Transmission failed.".to_string()),
    };

    [
        format!("1. Raw Binary Data: {}", transmission.raw_bits),
        format!("2. Stuffed Binary Data: {}", transmission.stuffed_bits),
        format!("FLAG: {}", String::from_utf8_lossy(FLAG)),
        format!("3. Transmission Frame: {}", transmission.frame),
        format!("Transmission Status: {status}"),
        format!("Server Acknowledgment: {ack}"),
    ]
    .join("\n")
}

#[derive(Serialize)]
struct SendReport<'a> {
    #[serde(flatten)]
    transmission: &'a Transmission,
    server: SocketAddr,
    ack: Option<&'a str>,
    error: Option<String>,
}

/// Renders the transmission as pretty JSON.
pub fn render_json(
    transmission: &Transmission,
    addr: SocketAddr,
    outcome: Result<&str, &ClientError>,
) -> ClientResult<String> {
    let report = SendReport {
        transmission,
        server: addr,
        ack: outcome.ok(),
        error: outcome.err().map(ToString::to_string),
    };
    serde_json::to_string_pretty(&report)
        .map_err(|e| ClientError::Protocol(format!("failed to serialize report: {}", e)))
}
