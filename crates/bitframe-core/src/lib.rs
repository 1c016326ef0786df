//! Core types: bit strings, text codec, bit-stuffing, tracing

pub mod bits;
pub mod error;
pub mod stuffing;
pub mod tracing;

pub use bits::{
    BITS_PER_CHAR, BitString, DECODE_ERROR_MARKER, Symbol, decode, decode_symbols, encode,
};
pub use error::{CoreError, CoreResult};
pub use stuffing::{MAX_RUN, longest_run, stuff, stuff_symbols, unstuff, unstuff_symbols};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
