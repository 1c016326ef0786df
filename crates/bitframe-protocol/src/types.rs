//! Acknowledgment messages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reply sent by the receiver for every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ack {
    /// Flags matched and the payload was recovered.
    Success,
    /// The frame did not carry matching flags.
    FlagSyncFailure,
}

impl Ack {
    const SUCCESS: &'static str = "ACK: Frame successfully processed and data recovered.";
    const FLAG_SYNC_FAILURE: &'static str = "ACK: ERROR - Flag synchronization failure.";

    /// Returns the wire text of this acknowledgment.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => Self::SUCCESS,
            Self::FlagSyncFailure => Self::FLAG_SYNC_FAILURE,
        }
    }

    /// Returns the wire bytes of this acknowledgment.
    pub const fn as_bytes(self) -> &'static [u8] {
        self.as_str().as_bytes()
    }

    /// Recognizes a received acknowledgment.
    pub fn from_wire(bytes: &[u8]) -> Option<Self> {
        [Self::Success, Self::FlagSyncFailure]
            .into_iter()
            .find(|ack| ack.as_bytes() == bytes)
    }

    /// Returns true for the success acknowledgment.
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl fmt::Display for Ack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
