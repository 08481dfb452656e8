use bytes::{Buf, Bytes, BytesMut};

use crate::error::{CodecError, Result};
use crate::extract::Frame;

/// Preferred header width: 5 ASCII decimal digits, zero-padded.
pub const HEADER_WIDTH: usize = 5;

/// Largest frame length representable at the preferred header width.
pub const MAX_PREFIXED_LEN: usize = 99_999;

/// Upper bound on header digits scanned when decoding or probing a record.
pub const HEADER_SCAN_WINDOW: usize = 20;

/// Default maximum frame length accepted when reading a container: 16 MiB.
pub const DEFAULT_MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Configuration for container read-back.
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// Maximum frame length a record may declare. Default: 16 MiB.
    pub max_frame_len: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }
}

/// Number of header digits used for a frame of `len` bytes.
///
/// Lengths up to [`MAX_PREFIXED_LEN`] use the fixed preferred width;
/// anything larger falls back to the minimal digit count.
pub fn header_width(len: usize) -> usize {
    if len <= MAX_PREFIXED_LEN {
        return HEADER_WIDTH;
    }
    let mut digits = 0;
    let mut value = len;
    while value > 0 {
        digits += 1;
        value /= 10;
    }
    digits
}

/// The header text for a frame of `len` bytes.
pub fn header_for(len: usize) -> String {
    if len <= MAX_PREFIXED_LEN {
        format!("{len:0width$}", width = HEADER_WIDTH)
    } else {
        len.to_string()
    }
}

/// Append one length-prefixed record to `dst`.
///
/// Wire format:
/// ```text
/// ┌────────────────────────┬──────────────────┐
/// │ Length (ASCII decimal) │ Frame bytes      │
/// │ 5 digits, zero-padded; │ (Length bytes)   │
/// │ unpadded above 99999   │                  │
/// └────────────────────────┴──────────────────┘
/// ```
///
/// Never fails: a frame past the preferred range simply gets a wider
/// header, which [`encode_container`] reports.
pub fn encode_frame(frame: &Frame, dst: &mut BytesMut) {
    let header = header_for(frame.len());
    dst.reserve(header.len() + frame.len());
    dst.extend_from_slice(header.as_bytes());
    dst.extend_from_slice(&frame.bytes);
}

/// A frame whose length cannot be represented at the preferred header width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OversizedFrame {
    /// Zero-based index in the encoded sequence.
    pub index: usize,
    /// Frame length in bytes.
    pub len: usize,
}

/// An encoded container plus the conditions observed while encoding.
#[derive(Debug, Clone)]
pub struct EncodedContainer {
    /// The complete container: concatenated length-prefixed records.
    pub bytes: Bytes,
    /// Frames that needed a wider-than-preferred header, in index order.
    pub oversized: Vec<OversizedFrame>,
}

/// Encode a frame sequence into a single container buffer.
///
/// Output length always equals the sum over frames of header width plus
/// frame length. Oversized frames are recorded, not rejected.
pub fn encode_container(frames: &[Frame]) -> EncodedContainer {
    let total: usize = frames
        .iter()
        .map(|frame| header_width(frame.len()) + frame.len())
        .sum();
    let mut dst = BytesMut::with_capacity(total);
    let mut oversized = Vec::new();

    for (index, frame) in frames.iter().enumerate() {
        if frame.len() > MAX_PREFIXED_LEN {
            oversized.push(OversizedFrame {
                index,
                len: frame.len(),
            });
        }
        encode_frame(frame, &mut dst);
    }

    EncodedContainer {
        bytes: dst.freeze(),
        oversized,
    }
}

/// Parse an ASCII digit run as a length, saturating on overflow.
///
/// Saturation only triggers on absurd declared lengths; the caller's
/// `max_frame_len` check rejects those anyway.
pub(crate) fn parse_digit_run(digits: &[u8]) -> usize {
    let mut value = 0usize;
    for &b in digits {
        value = value
            .saturating_mul(10)
            .saturating_add((b - b'0') as usize);
    }
    value
}

/// Decode one record from the front of a container buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete record yet.
/// On success, consumes the record bytes from the buffer.
///
/// The header is a run of ASCII digits ended by the frame's first byte,
/// which for JPEG frames is always 0xFF. A record whose frame starts with
/// a digit would merge into the header run and cannot be framed. Runs that
/// fill the whole scan window are rejected; no real frame length needs 20
/// digits.
pub fn decode_record(src: &mut BytesMut, max_frame_len: usize) -> Result<Option<Frame>> {
    if src.is_empty() {
        return Ok(None); // Need more data
    }

    let window = src.len().min(HEADER_SCAN_WINDOW);
    let mut width = 0;
    while width < window && src[width].is_ascii_digit() {
        width += 1;
    }

    if width == 0 {
        return Err(CodecError::InvalidHeader { byte: src[0] });
    }
    if width == HEADER_SCAN_WINDOW {
        return Err(CodecError::HeaderTooLong {
            max: HEADER_SCAN_WINDOW,
        });
    }
    if width == src.len() {
        // All buffered bytes are digits; the frame's first byte, which
        // terminates the header, hasn't arrived yet.
        return Ok(None);
    }

    let declared = parse_digit_run(&src[..width]);
    if declared > max_frame_len {
        return Err(CodecError::FrameTooLarge {
            declared,
            max: max_frame_len,
        });
    }

    let total = width + declared;
    if src.len() < total {
        return Ok(None); // Need more data
    }

    src.advance(width);
    let bytes = src.split_to(declared).freeze();

    Ok(Some(Frame { bytes }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_of(len: usize) -> Frame {
        Frame::new(vec![0xAB; len])
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let frame = Frame::new(vec![0xFF, 0xD8, 0xAA, 0xBB, 0xFF, 0xD9]);
        let mut buf = BytesMut::new();

        encode_frame(&frame, &mut buf);

        assert_eq!(buf.len(), HEADER_WIDTH + 6);
        assert_eq!(&buf[..HEADER_WIDTH], b"00006");

        let decoded = decode_record(&mut buf, DEFAULT_MAX_FRAME_LEN)
            .unwrap()
            .unwrap();

        assert_eq!(decoded.bytes.as_ref(), frame.bytes.as_ref());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_header_is_zero_padded() {
        let mut buf = BytesMut::new();
        encode_frame(&frame_of(42), &mut buf);
        assert_eq!(&buf[..HEADER_WIDTH], b"00042");
    }

    #[test]
    fn test_header_at_preferred_limit() {
        assert_eq!(header_for(99_999), "99999");
        assert_eq!(header_for(100_000), "100000");
        assert_eq!(header_for(0), "00000");
    }

    #[test]
    fn test_header_width_matches_header_text() {
        for len in [0, 1, 42, 9_999, 99_999, 100_000, 1_234_567] {
            assert_eq!(header_width(len), header_for(len).len());
        }
    }

    #[test]
    fn test_container_length_is_deterministic() {
        let frames = [frame_of(10), frame_of(99_999), frame_of(100_000)];
        let encoded = encode_container(&frames);

        let expected: usize = frames
            .iter()
            .map(|f| header_width(f.len()) + f.len())
            .sum();
        assert_eq!(encoded.bytes.len(), expected);
    }

    #[test]
    fn test_oversized_frames_are_reported() {
        let frames = [frame_of(5), frame_of(100_001), frame_of(7)];
        let encoded = encode_container(&frames);

        assert_eq!(encoded.oversized.len(), 1);
        assert_eq!(
            encoded.oversized[0],
            OversizedFrame {
                index: 1,
                len: 100_001
            }
        );
    }

    #[test]
    fn test_empty_sequence_encodes_empty() {
        let encoded = encode_container(&[]);
        assert!(encoded.bytes.is_empty());
        assert!(encoded.oversized.is_empty());
    }

    #[test]
    fn test_decode_multiple_records() {
        let frames = [frame_of(3), frame_of(8)];
        let encoded = encode_container(&frames);
        let mut buf = BytesMut::from(encoded.bytes.as_ref());

        let first = decode_record(&mut buf, DEFAULT_MAX_FRAME_LEN)
            .unwrap()
            .unwrap();
        assert_eq!(first.len(), 3);

        let second = decode_record(&mut buf, DEFAULT_MAX_FRAME_LEN)
            .unwrap()
            .unwrap();
        assert_eq!(second.len(), 8);

        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_incomplete_header() {
        let mut buf = BytesMut::from(&b"000"[..]);
        let result = decode_record(&mut buf, DEFAULT_MAX_FRAME_LEN).unwrap();
        assert!(result.is_none());
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn test_decode_incomplete_payload() {
        let mut buf = BytesMut::from(&b"00006\xFF\xD8"[..]);
        let result = decode_record(&mut buf, DEFAULT_MAX_FRAME_LEN).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_decode_invalid_leading_byte() {
        let mut buf = BytesMut::from(&[0xFF, 0xD8, 0xFF, 0xD9][..]);
        let result = decode_record(&mut buf, DEFAULT_MAX_FRAME_LEN);
        assert!(matches!(
            result,
            Err(CodecError::InvalidHeader { byte: 0xFF })
        ));
    }

    #[test]
    fn test_decode_runaway_digits() {
        let mut buf = BytesMut::from(&b"123456789012345678901"[..]);
        let result = decode_record(&mut buf, DEFAULT_MAX_FRAME_LEN);
        assert!(matches!(result, Err(CodecError::HeaderTooLong { max: 20 })));
    }

    #[test]
    fn test_decode_frame_too_large() {
        let mut buf = BytesMut::from(&b"00512\xFF\xD8"[..]);
        let result = decode_record(&mut buf, 100);
        assert!(matches!(
            result,
            Err(CodecError::FrameTooLarge {
                declared: 512,
                max: 100
            })
        ));
    }

    #[test]
    fn test_decode_variable_width_record() {
        let frame = frame_of(100_000);
        let mut buf = BytesMut::new();
        encode_frame(&frame, &mut buf);

        assert_eq!(&buf[..6], b"100000");

        let decoded = decode_record(&mut buf, DEFAULT_MAX_FRAME_LEN)
            .unwrap()
            .unwrap();
        assert_eq!(decoded.len(), 100_000);
    }

    #[test]
    fn test_all_digit_buffer_waits_for_terminator() {
        // Five digits alone could still be the prefix of a longer run.
        let mut buf = BytesMut::from(&b"00000"[..]);
        let result = decode_record(&mut buf, DEFAULT_MAX_FRAME_LEN).unwrap();
        assert!(result.is_none());
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn test_decode_zero_length_record() {
        // The next frame's first byte (0xFF for JPEG) terminates the digit
        // run, so an empty record decodes once anything follows it.
        let mut buf = BytesMut::from(&b"00000\xFF"[..]);
        let frame = decode_record(&mut buf, DEFAULT_MAX_FRAME_LEN)
            .unwrap()
            .unwrap();
        assert!(frame.is_empty());
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn test_parse_digit_run_saturates() {
        assert_eq!(parse_digit_run(b"00042"), 42);
        assert_eq!(parse_digit_run(b"99999999999999999999"), usize::MAX);
    }
}
