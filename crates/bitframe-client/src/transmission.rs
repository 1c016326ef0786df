//! Sender-side pipeline: text to raw bits, stuffed bits and frame.

use serde::Serialize;
use tracing::debug;

use bitframe_core::{BitString, encode, stuff};
use bitframe_protocol::{READ_BUFFER_SIZE, wrap};

use crate::error::{ClientError, ClientResult};

/// Artifacts produced for one outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transmission {
    /// Message as given.
    pub message: String,
    /// Encoded message.
    pub raw_bits: BitString,
    /// Encoded message after bit-stuffing.
    pub stuffed_bits: BitString,
    /// Wire frame (flags included).
    pub frame: String,
}

impl Transmission {
    /// Encodes, stuffs and frames `message`.
    ///
    /// # Errors
    ///
    /// Fails for an empty message or one with characters beyond 8 bits.
    pub fn prepare(message: &str) -> ClientResult<Self> {
        if message.is_empty() {
            return Err(ClientError::EmptyMessage);
        }

        let raw_bits = encode(message)?;
        let stuffed_bits = stuff(&raw_bits);
        let frame = String::from_utf8_lossy(&wrap(&stuffed_bits)).into_owned();

        debug!(
            raw = raw_bits.len(),
            stuffed = stuffed_bits.len(),
            "frame prepared"
        );

        Ok(Self {
            message: message.to_string(),
            raw_bits,
            stuffed_bits,
            frame,
        })
    }

    /// Returns the bytes to put on the wire.
    pub fn frame_bytes(&self) -> &[u8] {
        self.frame.as_bytes()
    }

    /// Returns true if the frame is longer than one server read.
    ///
    /// A server in `chunk` mode splits such a frame and rejects the pieces.
    pub fn exceeds_single_read(&self) -> bool {
        self.frame.len() > READ_BUFFER_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_single_letter() {
        let tx = Transmission::prepare("A").unwrap();
        assert_eq!(tx.raw_bits.to_string(), "01000001");
        assert_eq!(tx.stuffed_bits, tx.raw_bits);
        assert_eq!(tx.frame, "011111100100000101111110");
    }

    #[test]
    fn prepare_stuffs_long_runs() {
        let tx = Transmission::prepare("1111101111111111").unwrap();
        assert_eq!(tx.raw_bits.to_string(), "1111101111111111");
        assert_eq!(tx.stuffed_bits.to_string(), "1111100111110111110");
        assert_eq!(tx.frame_bytes().len(), 19 + 16);
    }

    #[test]
    fn long_message_exceeds_single_read() {
        // 126 plain letters plus flags stay within 1024 bytes.
        assert!(!Transmission::prepare(&"a".repeat(126)).unwrap().exceeds_single_read());
        assert!(Transmission::prepare(&"a".repeat(127)).unwrap().exceeds_single_read());
    }

    #[test]
    fn prepare_rejects_empty() {
        assert!(matches!(
            Transmission::prepare(""),
            Err(ClientError::EmptyMessage)
        ));
    }

    #[test]
    fn prepare_rejects_wide_characters() {
        assert!(matches!(
            Transmission::prepare("snow ☃"),
            Err(ClientError::Encoding(_))
        ));
    }

    #[test]
    fn serializes_bits_as_strings() {
        let tx = Transmission::prepare("A").unwrap();
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["raw_bits"], "01000001");
        assert_eq!(json["frame"], "011111100100000101111110");
    }
}
