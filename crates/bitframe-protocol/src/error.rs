//! Protocol error types.

use bitframe_core::CoreError;
use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while framing or exchanging frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Frame does not start and end with the flag pattern.
    #[error("flag synchronization lost: {reason}")]
    FrameSync { reason: String },

    /// Payload breaks the stuffing rule.
    #[error("malformed payload: {0}")]
    Stuffing(#[from] CoreError),

    /// Buffered bytes grew past the limit without a closing flag.
    #[error("frame too large: {size} bytes (max: {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// Operation timed out.
    #[error("timeout during {operation}")]
    Timeout { operation: String },
}

impl ProtocolError {
    /// Creates a flag synchronization error.
    pub fn frame_sync(reason: impl Into<String>) -> Self {
        Self::FrameSync {
            reason: reason.into(),
        }
    }

    /// Creates a timeout error.
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Returns true if the peer should be told that synchronization was lost.
    ///
    /// Six consecutive `1` bits inside a frame can only be a flag, so a
    /// stuffing violation is a synchronization loss as well.
    pub fn is_sync_failure(&self) -> bool {
        matches!(
            self,
            Self::FrameSync { .. } | Self::Stuffing(_) | Self::FrameTooLarge { .. }
        )
    }
}
