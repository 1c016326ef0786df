//! Flag framing and acknowledgment types for bitframe.
//!
//! # Wire format
//!
//! A frame is ASCII text, one character per bit, delimited by the flag
//! pattern on both ends:
//!
//! ```text
//! +------------+---------------------+------------+
//! | 01111110   |  stuffed payload    | 01111110   |
//! +------------+---------------------+------------+
//! ```
//!
//! The receiver answers every frame with one [`Ack`] string.
//!
//! # Example
//!
//! ```rust
//! use bitframe_core::{encode, stuff};
//! use bitframe_protocol::{unwrap, wrap};
//!
//! let stuffed = stuff(&encode("A").unwrap());
//! let frame = wrap(&stuffed);
//! assert_eq!(frame, b"011111100100000101111110");
//! assert_eq!(unwrap(&frame).unwrap(), b"01000001");
//! ```

mod error;
mod framing;
mod types;

pub use error::{ProtocolError, ProtocolResult};
pub use framing::{FLAG, FrameAssembler, unwrap, wrap};
pub use types::Ack;

/// Default host, loopback only.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default TCP port shared by both ends.
pub const DEFAULT_PORT: u16 = 666;

/// Size of a single read from the stream (and of the reply buffer).
pub const READ_BUFFER_SIZE: usize = 1024;

/// Largest frame the reassembler buffers before giving up (1 MB).
pub const MAX_FRAME_SIZE: usize = 1024 * 1024;
