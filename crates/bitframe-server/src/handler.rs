//! Frame decoding pipeline.
//!
//! Turns one received frame into a [`FrameReport`]: flags are checked, the
//! payload is unstuffed and decoded, and exactly one [`Ack`] is chosen.

use serde::Serialize;
use tracing::{info, warn};

use bitframe_core::{BITS_PER_CHAR, decode_symbols, unstuff_symbols};
use bitframe_protocol::{Ack, FLAG, ProtocolError, unwrap};

/// Content recovered from a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Recovered {
    /// Payload was a whole number of bytes and decoded as text.
    Text(String),
    /// Payload was empty or not byte aligned; surfaced as received.
    Bits(String),
}

/// Artifacts produced while processing one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameReport {
    /// The frame as received.
    pub received: String,
    /// Payload between the flags, still stuffed.
    pub extracted: Option<String>,
    /// Payload after unstuffing.
    pub unstuffed: Option<String>,
    /// Decoded content.
    pub recovered: Option<Recovered>,
    /// Acknowledgment returned to the sender.
    pub ack: Ack,
}

impl FrameReport {
    fn rejected(received: String, extracted: Option<String>, error: &ProtocolError) -> Self {
        warn!(error = %error, "Frame synchronization lost");
        Self {
            received,
            extracted,
            unstuffed: None,
            recovered: None,
            ack: Ack::FlagSyncFailure,
        }
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Runs the receive pipeline on one frame.
///
/// Never fails: a frame without matching flags, or with a run of six `1`
/// bits inside, is answered with [`Ack::FlagSyncFailure`].
pub fn handle_frame(frame: &[u8]) -> FrameReport {
    let received = lossy(frame);
    info!(flag = %lossy(FLAG), frame = %received, "Received frame");

    let payload = match unwrap(frame) {
        Ok(payload) => payload,
        Err(e) => return FrameReport::rejected(received, None, &e),
    };
    let extracted = lossy(payload);
    info!(payload = %extracted, "Extracted stuffed payload");

    let unstuffed = match unstuff_symbols(payload) {
        Ok(unstuffed) => unstuffed,
        Err(e) => return FrameReport::rejected(received, Some(extracted), &e.into()),
    };
    let unstuffed_text = lossy(&unstuffed);
    info!(bits = %unstuffed_text, "Unstuffed payload");

    let recovered = if !unstuffed.is_empty() && unstuffed.len() % BITS_PER_CHAR == 0 {
        let text = decode_symbols(&unstuffed);
        info!(text = %text, "Recovered text");
        Recovered::Text(text)
    } else {
        info!(bits = %unstuffed_text, "Recovered bits (not byte aligned)");
        Recovered::Bits(unstuffed_text.clone())
    };

    FrameReport {
        received,
        extracted: Some(extracted),
        unstuffed: Some(unstuffed_text),
        recovered: Some(recovered),
        ack: Ack::Success,
    }
}
