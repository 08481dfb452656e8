use std::fmt;

use crate::codec::{parse_digit_run, HEADER_SCAN_WINDOW, HEADER_WIDTH};
use crate::markers::{COM, SOI};

/// Classification of a byte buffer's framing convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFormat {
    /// The first five bytes are ASCII digits: already a length-prefixed
    /// container.
    LengthPrefixed,
    /// Raw JPEG/MJPEG with a COM segment directly after SOI.
    RawWithComment,
    /// Raw JPEG/MJPEG with no leading COM segment.
    RawClean,
    /// Matches none of the known layouts.
    Unrecognized,
}

impl fmt::Display for StreamFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamFormat::LengthPrefixed => "length-prefixed",
            StreamFormat::RawWithComment => "raw-with-comment",
            StreamFormat::RawClean => "raw-clean",
            StreamFormat::Unrecognized => "unrecognized",
        };
        f.write_str(name)
    }
}

/// Classify a buffer by its leading bytes.
///
/// The length-prefix check looks at exactly [`HEADER_WIDTH`] bytes. That is
/// a deliberate quick test: containers whose first record uses a wider
/// header still pass it, and [`probe_header`] recovers the real width.
pub fn detect_format(data: &[u8]) -> StreamFormat {
    if data.len() >= HEADER_WIDTH && data[..HEADER_WIDTH].iter().all(u8::is_ascii_digit) {
        return StreamFormat::LengthPrefixed;
    }
    if data.len() >= 2 && data[..2] == SOI {
        if data.len() >= 4 && data[2..4] == COM {
            return StreamFormat::RawWithComment;
        }
        return StreamFormat::RawClean;
    }
    StreamFormat::Unrecognized
}

/// Header facts recovered from the first record of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderProbe {
    /// Digit count of the recovered header.
    pub width: usize,
    /// The header's decimal value: the declared length of the first frame.
    pub declared_len: usize,
    /// The two bytes immediately after the header, when present.
    pub following: Option<[u8; 2]>,
}

impl HeaderProbe {
    /// True when the header uses the preferred fixed width.
    pub fn is_preferred_width(&self) -> bool {
        self.width == HEADER_WIDTH
    }

    /// True when the bytes after the header start a JPEG frame.
    pub fn frame_starts_with_soi(&self) -> bool {
        self.following == Some(SOI)
    }
}

/// Recover the actual header layout at the start of a container buffer.
///
/// Counts consecutive ASCII digits within a bounded window, parses the run,
/// and captures the two bytes after it. Returns `None` when the buffer does
/// not begin with a digit.
pub fn probe_header(data: &[u8]) -> Option<HeaderProbe> {
    let window = data.len().min(HEADER_SCAN_WINDOW);
    let mut width = 0;
    while width < window && data[width].is_ascii_digit() {
        width += 1;
    }
    if width == 0 {
        return None;
    }

    let declared_len = parse_digit_run(&data[..width]);
    let following = data.get(width..width + 2).map(|pair| [pair[0], pair[1]]);

    Some(HeaderProbe {
        width,
        declared_len,
        following,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_container;
    use crate::extract::Frame;

    #[test]
    fn test_detect_length_prefixed() {
        assert_eq!(
            detect_format(b"00010\xFF\xD8junk"),
            StreamFormat::LengthPrefixed
        );
    }

    #[test]
    fn test_detect_checks_exactly_five_bytes() {
        // Four digits then a non-digit is not a container, and the buffer
        // does not start with SOI either.
        assert_eq!(detect_format(b"0001\xFF\xD8"), StreamFormat::Unrecognized);
        // Digits past the fifth byte do not matter for the quick check.
        assert_eq!(detect_format(b"123456789"), StreamFormat::LengthPrefixed);
    }

    #[test]
    fn test_detect_raw_with_comment() {
        let data = [0xFF, 0xD8, 0xFF, 0xFE, 0x00, 0x10];
        assert_eq!(detect_format(&data), StreamFormat::RawWithComment);
    }

    #[test]
    fn test_detect_raw_clean() {
        let data = [0xFF, 0xD8, 0xFF, 0xDB, 0x00, 0x43];
        assert_eq!(detect_format(&data), StreamFormat::RawClean);
        // Bare SOI with nothing after it still counts as raw.
        assert_eq!(detect_format(&[0xFF, 0xD8]), StreamFormat::RawClean);
    }

    #[test]
    fn test_detect_unrecognized() {
        assert_eq!(detect_format(b""), StreamFormat::Unrecognized);
        assert_eq!(detect_format(b"RIFF"), StreamFormat::Unrecognized);
        assert_eq!(detect_format(&[0xFF, 0xD9]), StreamFormat::Unrecognized);
    }

    #[test]
    fn test_probe_preferred_header() {
        let probe = probe_header(b"00006\xFF\xD8\xAA\xBB\xFF\xD9").unwrap();

        assert_eq!(probe.width, 5);
        assert_eq!(probe.declared_len, 6);
        assert_eq!(probe.following, Some([0xFF, 0xD8]));
        assert!(probe.is_preferred_width());
        assert!(probe.frame_starts_with_soi());
    }

    #[test]
    fn test_probe_variable_width_header() {
        let probe = probe_header(b"100000\xFF\xD8").unwrap();

        assert_eq!(probe.width, 6);
        assert_eq!(probe.declared_len, 100_000);
        assert!(!probe.is_preferred_width());
        assert!(probe.frame_starts_with_soi());
    }

    #[test]
    fn test_probe_short_buffer() {
        let probe = probe_header(b"123").unwrap();

        assert_eq!(probe.width, 3);
        assert_eq!(probe.declared_len, 123);
        assert_eq!(probe.following, None);
        assert!(!probe.frame_starts_with_soi());
    }

    #[test]
    fn test_probe_non_digit_start() {
        assert!(probe_header(&[0xFF, 0xD8]).is_none());
        assert!(probe_header(b"").is_none());
    }

    #[test]
    fn test_probe_stops_at_scan_window() {
        let mut data = vec![b'9'; 32];
        data.push(0xFF);
        let probe = probe_header(&data).unwrap();

        assert_eq!(probe.width, HEADER_SCAN_WINDOW);
        // 20 nines saturate the parsed length.
        assert_eq!(probe.declared_len, usize::MAX);
        assert_eq!(probe.following, Some([b'9', b'9']));
    }

    #[test]
    fn test_probe_agrees_with_encoder() {
        let frames = [Frame::new(vec![0xFF, 0xD8, 0x00, 0xFF, 0xD9])];
        let encoded = encode_container(&frames);
        let probe = probe_header(&encoded.bytes).unwrap();

        assert_eq!(probe.width, HEADER_WIDTH);
        assert_eq!(probe.declared_len, 5);
        assert!(probe.frame_starts_with_soi());
    }
}
