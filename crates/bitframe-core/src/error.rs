//! Core error types.

use thiserror::Error;

/// Result type for core codec operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors produced by the bit codec and the stuffing engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A character cannot be represented in 8 bits.
    #[error("character {ch:?} at position {position} is outside the 8-bit range")]
    Encoding { ch: char, position: usize },

    /// A bit string contained something other than `0` or `1`.
    #[error("invalid bit symbol {symbol:?} at position {position}")]
    InvalidSymbol { symbol: char, position: usize },

    /// Five consecutive set bits were not followed by a stuffed `0`.
    #[error("malformed stuffing at bit {position}: expected 0 after five consecutive 1s")]
    Stuffing { position: usize },
}
