//! Flag-delimited framing.
//!
//! ```text
//! +------------+---------------------+------------+
//! | 01111110   |  stuffed payload    | 01111110   |
//! +------------+---------------------+------------+
//! ```
//!
//! The payload needs no escaping: stuffing guarantees it never holds six
//! consecutive `1` bits, and the flag cannot straddle the payload and the
//! closing flag without such a run either.

use bitframe_core::BitString;

use crate::MAX_FRAME_SIZE;
use crate::error::{ProtocolError, ProtocolResult};

/// Frame delimiter, as ASCII bits.
pub const FLAG: &[u8; 8] = b"01111110";

/// Wraps a stuffed payload between two flags.
pub fn wrap(stuffed: &BitString) -> Vec<u8> {
    let mut frame = Vec::with_capacity(stuffed.len() + 2 * FLAG.len());
    frame.extend_from_slice(FLAG);
    frame.extend(stuffed.to_wire());
    frame.extend_from_slice(FLAG);
    frame
}

/// Returns the payload between the opening and closing flags.
///
/// # Errors
///
/// Returns [`ProtocolError::FrameSync`] when the frame is shorter than two
/// flags or does not start and end with the flag.
pub fn unwrap(frame: &[u8]) -> ProtocolResult<&[u8]> {
    if frame.len() < 2 * FLAG.len() {
        return Err(ProtocolError::frame_sync(format!(
            "frame of {} bytes cannot hold two flags",
            frame.len()
        )));
    }
    if !frame.starts_with(FLAG) {
        return Err(ProtocolError::frame_sync("opening flag not found"));
    }
    if !frame.ends_with(FLAG) {
        return Err(ProtocolError::frame_sync("closing flag not found"));
    }

    Ok(&frame[FLAG.len()..frame.len() - FLAG.len()])
}

fn find_flag(buffer: &[u8], from: usize) -> Option<usize> {
    buffer
        .get(from..)?
        .windows(FLAG.len())
        .position(|window| window == FLAG)
        .map(|offset| offset + from)
}

/// Reassembles frames from a byte stream by scanning for flags.
///
/// Bytes are pushed as they arrive, regardless of read boundaries. Each call
/// to [`next_frame`](Self::next_frame) returns one complete frame, flags
/// included, or an error for bytes that cannot belong to any frame.
#[derive(Debug)]
pub struct FrameAssembler {
    buffer: Vec<u8>,
    max_frame_size: usize,
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameAssembler {
    /// Creates an assembler with the default size limit.
    pub fn new() -> Self {
        Self::with_max_frame_size(MAX_FRAME_SIZE)
    }

    /// Creates an assembler that gives up on frames larger than `max`.
    pub fn with_max_frame_size(max: usize) -> Self {
        Self {
            buffer: Vec::new(),
            max_frame_size: max,
        }
    }

    /// Appends received bytes.
    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Number of bytes waiting for a closing flag.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Takes the next complete frame out of the buffer.
    ///
    /// Returns `None` when more bytes are needed. Two adjacent flags are an
    /// empty frame. Bytes ahead of an opening flag spoil the frame they
    /// precede: it is consumed together with them and comes back as a single
    /// [`ProtocolError::FrameSync`].
    pub fn next_frame(&mut self) -> Option<ProtocolResult<Vec<u8>>> {
        let Some(open) = find_flag(&self.buffer, 0) else {
            return self.check_size();
        };
        let Some(close) = find_flag(&self.buffer, open + FLAG.len()) else {
            return self.check_size();
        };

        let frame: Vec<u8> = self.buffer.drain(..close + FLAG.len()).collect();
        if open > 0 {
            return Some(Err(ProtocolError::frame_sync(format!(
                "{open} bytes before opening flag"
            ))));
        }
        Some(Ok(frame))
    }

    /// Drains whatever is left once the stream has ended.
    ///
    /// Returns an error if the leftover bytes never formed a frame.
    pub fn finish(&mut self) -> Option<ProtocolError> {
        if self.buffer.is_empty() {
            return None;
        }
        let size = self.buffer.len();
        self.buffer.clear();
        Some(ProtocolError::frame_sync(format!(
            "stream ended inside a frame ({size} bytes unterminated)"
        )))
    }

    fn check_size(&mut self) -> Option<ProtocolResult<Vec<u8>>> {
        if self.buffer.len() <= self.max_frame_size {
            return None;
        }
        let size = self.buffer.len();
        self.buffer.clear();
        Some(Err(ProtocolError::FrameTooLarge {
            size,
            max: self.max_frame_size,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitframe_core::{encode, stuff, unstuff_symbols};

    fn frame_for(text: &str) -> Vec<u8> {
        wrap(&stuff(&encode(text).unwrap()))
    }

    #[test]
    fn wrap_single_letter() {
        assert_eq!(frame_for("A"), b"011111100100000101111110".to_vec());
    }

    #[test]
    fn wrap_adds_sixteen_bytes() {
        let stuffed = stuff(&encode("hello").unwrap());
        assert_eq!(wrap(&stuffed).len(), stuffed.len() + 16);
    }

    #[test]
    fn unwrap_returns_payload() {
        for payload in ["", "0", "01000001", "1111100111110111110"] {
            let bits: BitString = payload.parse().unwrap();
            let frame = wrap(&bits);
            assert_eq!(unwrap(&frame).unwrap(), payload.as_bytes());
        }
    }

    #[test]
    fn unwrap_missing_trailing_flag() {
        let result = unwrap(b"0111111001000001");
        assert!(matches!(result, Err(ProtocolError::FrameSync { .. })));

        let result = unwrap(b"01111110010000010111111");
        assert!(matches!(result, Err(ProtocolError::FrameSync { .. })));
    }

    #[test]
    fn unwrap_missing_leading_flag() {
        let result = unwrap(b"0100000101111110");
        assert!(matches!(result, Err(ProtocolError::FrameSync { .. })));
    }

    #[test]
    fn unwrap_rejects_lone_flag() {
        let err = unwrap(FLAG).unwrap_err();
        assert!(err.is_sync_failure());
        assert!(err.to_string().contains("two flags"));
    }

    #[test]
    fn unwrap_empty_input() {
        assert!(matches!(unwrap(b""), Err(ProtocolError::FrameSync { .. })));
    }

    #[test]
    fn stuffed_payload_never_contains_flag() {
        let text = "~\u{7f}\u{ff}\u{fe}~~";
        let frame = frame_for(text);
        let payload = unwrap(&frame).unwrap();
        assert!(find_flag(payload, 0).is_none());
        assert_eq!(find_flag(&frame, 1), Some(frame.len() - FLAG.len()));
    }

    #[test]
    fn assembler_single_frame_in_pieces() {
        let frame = frame_for("Hi");
        let mut assembler = FrameAssembler::new();

        let (first, second) = frame.split_at(11);
        assembler.push(first);
        assert!(assembler.next_frame().is_none());

        assembler.push(second);
        assert_eq!(assembler.next_frame().unwrap().unwrap(), frame);
        assert!(assembler.next_frame().is_none());
        assert_eq!(assembler.buffered(), 0);
    }

    #[test]
    fn assembler_two_frames_in_one_read() {
        let first = frame_for("ab");
        let second = frame_for("\u{ff}\u{ff}");
        let mut assembler = FrameAssembler::new();
        assembler.push(&[first.clone(), second.clone()].concat());

        assert_eq!(assembler.next_frame().unwrap().unwrap(), first);
        let got = assembler.next_frame().unwrap().unwrap();
        assert_eq!(got, second);
        assert_eq!(
            unstuff_symbols(unwrap(&got).unwrap()).unwrap(),
            encode("\u{ff}\u{ff}").unwrap().to_wire()
        );
        assert!(assembler.next_frame().is_none());
    }

    #[test]
    fn assembler_folds_garbage_into_following_frame() {
        let frame = frame_for("A");
        let mut assembler = FrameAssembler::new();
        assembler.push(b"xyz");
        assembler.push(&frame[..10]);
        assert!(assembler.next_frame().is_none());

        assembler.push(&frame[10..]);
        let second = frame_for("B");
        assembler.push(&second);

        let err = assembler.next_frame().unwrap().unwrap_err();
        assert!(matches!(err, ProtocolError::FrameSync { .. }));
        assert!(err.to_string().contains("3 bytes before opening flag"));
        assert_eq!(assembler.next_frame().unwrap().unwrap(), second);
        assert!(assembler.next_frame().is_none());
    }

    #[test]
    fn assembler_returns_adjacent_flags_as_empty_frame() {
        let empty = wrap(&BitString::new());
        let frame = frame_for("A");
        let mut assembler = FrameAssembler::new();
        assembler.push(&empty);
        assembler.push(&frame);

        let got = assembler.next_frame().unwrap().unwrap();
        assert_eq!(got, b"0111111001111110");
        assert!(unwrap(&got).unwrap().is_empty());
        assert_eq!(assembler.next_frame().unwrap().unwrap(), frame);
    }

    #[test]
    fn assembler_finish_reports_unterminated_frame() {
        let mut assembler = FrameAssembler::new();
        assembler.push(b"0111111001000001");
        assert!(assembler.next_frame().is_none());

        let err = assembler.finish().unwrap();
        assert!(err.is_sync_failure());
        assert!(assembler.finish().is_none());
    }

    #[test]
    fn assembler_enforces_size_limit() {
        let mut assembler = FrameAssembler::with_max_frame_size(32);
        assembler.push(FLAG);
        assembler.push(&[b'0'; 40]);

        let err = assembler.next_frame().unwrap().unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::FrameTooLarge { size: 48, max: 32 }
        ));
        assert_eq!(assembler.buffered(), 0);
    }
}
