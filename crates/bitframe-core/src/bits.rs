//! Text to bit-string codec.
//!
//! Every character becomes its 8-bit code, most significant bit first,
//! except the literal characters `0` and `1` which pass through as a single
//! bit. Because of that pass-through, text containing `0`/`1` does not
//! survive a round trip through [`decode`].
//!
//! ```rust
//! use bitframe_core::bits::{decode, encode};
//!
//! let bits = encode("A").unwrap();
//! assert_eq!(bits.to_string(), "01000001");
//! assert_eq!(decode(&bits), "A");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Number of bits used for one encoded character.
pub const BITS_PER_CHAR: usize = 8;

/// Placeholder emitted by [`decode_symbols`] for a group that is not a byte.
pub const DECODE_ERROR_MARKER: &str = "[ERR]";

/// A single position in a bit sequence.
///
/// Implemented for `bool` (validated bits) and for `u8` (raw ASCII symbols as
/// they arrive on the wire). A `u8` symbol may be neither set nor unset.
pub trait Symbol: Copy {
    /// The symbol for a set bit.
    const SET: Self;
    /// The symbol for an unset bit.
    const UNSET: Self;

    fn is_set(self) -> bool;
    fn is_unset(self) -> bool;
}

impl Symbol for bool {
    const SET: Self = true;
    const UNSET: Self = false;

    fn is_set(self) -> bool {
        self
    }

    fn is_unset(self) -> bool {
        !self
    }
}

impl Symbol for u8 {
    const SET: Self = b'1';
    const UNSET: Self = b'0';

    fn is_set(self) -> bool {
        self == b'1'
    }

    fn is_unset(self) -> bool {
        self == b'0'
    }
}

/// An ordered sequence of bits, rendered as a string of `0` and `1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct BitString {
    bits: Vec<bool>,
}

impl BitString {
    /// Creates an empty bit string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses raw ASCII symbols, rejecting anything but `0` and `1`.
    pub fn from_symbols(symbols: &[u8]) -> CoreResult<Self> {
        let bits = symbols
            .iter()
            .enumerate()
            .map(|(position, &symbol)| match symbol {
                b'0' => Ok(false),
                b'1' => Ok(true),
                _ => Err(CoreError::InvalidSymbol {
                    symbol: char::from(symbol),
                    position,
                }),
            })
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Self { bits })
    }

    /// Returns the number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns true if there are no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns the bits as a slice.
    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// Iterates over the bits.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    /// Returns the ASCII wire representation (one byte per bit).
    pub fn to_wire(&self) -> Vec<u8> {
        self.bits
            .iter()
            .map(|&bit| if bit { b'1' } else { b'0' })
            .collect()
    }
}

impl From<Vec<bool>> for BitString {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl From<BitString> for String {
    fn from(bits: BitString) -> Self {
        bits.to_string()
    }
}

impl TryFrom<String> for BitString {
    type Error = CoreError;

    fn try_from(value: String) -> CoreResult<Self> {
        value.parse()
    }
}

impl FromStr for BitString {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::from_symbols(s.as_bytes())
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Encodes text into a bit string.
///
/// Literal `0` and `1` characters are appended as one bit each. Any other
/// character is appended as its 8-bit code.
///
/// # Errors
///
/// Returns [`CoreError::Encoding`] for a character whose code is above 255.
pub fn encode(text: &str) -> CoreResult<BitString> {
    let mut bits = Vec::with_capacity(text.len() * BITS_PER_CHAR);

    for (position, ch) in text.chars().enumerate() {
        match ch {
            '0' => bits.push(false),
            '1' => bits.push(true),
            _ => {
                let code = u8::try_from(u32::from(ch))
                    .map_err(|_| CoreError::Encoding { ch, position })?;
                bits.extend((0..BITS_PER_CHAR).rev().map(|shift| (code >> shift) & 1 == 1));
            }
        }
    }

    Ok(BitString { bits })
}

/// Decodes a bit string into text, one character per 8-bit group.
///
/// A trailing group shorter than 8 bits is dropped.
pub fn decode(bits: &BitString) -> String {
    decode_symbols(bits.as_slice())
}

/// Decodes symbols into text, one character per 8-symbol group.
///
/// A group holding anything other than set/unset symbols is replaced by
/// [`DECODE_ERROR_MARKER`] and decoding carries on. A trailing group shorter
/// than 8 symbols is dropped.
pub fn decode_symbols<S: Symbol>(symbols: &[S]) -> String {
    let mut text = String::with_capacity(symbols.len() / BITS_PER_CHAR);

    for group in symbols.chunks_exact(BITS_PER_CHAR) {
        match group_value(group) {
            Some(code) => text.push(char::from(code)),
            None => text.push_str(DECODE_ERROR_MARKER),
        }
    }

    text
}

fn group_value<S: Symbol>(group: &[S]) -> Option<u8> {
    group.iter().try_fold(0u8, |acc, &symbol| {
        if symbol.is_set() {
            Some((acc << 1) | 1)
        } else if symbol.is_unset() {
            Some(acc << 1)
        } else {
            None
        }
    })
}
