use bytes::{Bytes, BytesMut};

use crate::markers::{COM, EOI, SOI};

/// A single JPEG frame carved out of a byte stream.
///
/// Frames produced by [`extract_frames`] always start with SOI and end with
/// EOI, so they are at least 4 bytes long. Frames read back from a container
/// carry whatever the record held; use [`Frame::has_jpeg_markers`] to check
/// conformance.
#[derive(Debug, Clone)]
pub struct Frame {
    /// The frame bytes.
    pub bytes: Bytes,
}

impl Frame {
    /// Create a frame from raw bytes.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Frame length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when the frame holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True when the frame starts with SOI and ends with EOI.
    pub fn has_jpeg_markers(&self) -> bool {
        self.bytes.len() >= 4
            && self.bytes[..2] == SOI
            && self.bytes[self.bytes.len() - 2..] == EOI
    }
}

/// A trailing frame that began with SOI but never reached EOI.
///
/// The partial frame is excluded from [`Extraction::frames`]; this records
/// what was dropped so callers can report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncatedTail {
    /// Offset of the partial frame's SOI marker in the source stream.
    pub offset: usize,
    /// Bytes the partial frame had accumulated when the stream ended.
    pub len: usize,
}

/// The outcome of scanning a raw stream for JPEG frames.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Complete frames in stream order.
    pub frames: Vec<Frame>,
    /// Present when the stream ended inside an unterminated frame.
    pub truncated_tail: Option<TruncatedTail>,
}

/// Extract complete JPEG frames from a raw MJPEG byte stream.
///
/// Scans left to right for SOI pairs. A COM segment placed directly after
/// SOI is skipped whole and never appears in the output frame: its declared
/// big-endian length counts the two length bytes, so the cursor advances
/// `2 + length` past the COM marker. Everything else between SOI and the
/// next EOI is copied verbatim, including marker-like byte pairs inside
/// entropy-coded data.
///
/// A frame whose EOI never arrives is dropped, not emitted; scanning stops
/// there and the loss is reported via [`Extraction::truncated_tail`].
pub fn extract_frames(data: &[u8]) -> Extraction {
    let mut frames = Vec::new();
    let mut truncated_tail = None;
    let mut i = 0;

    while i + 1 < data.len() {
        if data[i..i + 2] != SOI {
            i += 1;
            continue;
        }

        let start = i;
        i += 2;

        // COM directly after SOI: skip marker, length field, and payload.
        if i + 3 < data.len() && data[i..i + 2] == COM {
            let declared = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
            i += 2 + declared;
        }

        let body = i;
        match find_eoi(data, body) {
            Some(eoi) => {
                let end = eoi + 2;
                let mut buf = BytesMut::with_capacity(2 + (end - body));
                buf.extend_from_slice(&SOI);
                buf.extend_from_slice(&data[body..end]);
                frames.push(Frame { bytes: buf.freeze() });
                i = end;
            }
            None => {
                // The tail length counts the SOI pair plus the body bytes a
                // copy would have reached before running out of pairs.
                let copied = (data.len() - 1).saturating_sub(body);
                truncated_tail = Some(TruncatedTail {
                    offset: start,
                    len: 2 + copied,
                });
                break;
            }
        }
    }

    Extraction {
        frames,
        truncated_tail,
    }
}

/// Find the next EOI pair at or after `from`.
fn find_eoi(data: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    while i + 1 < data.len() {
        if data[i..i + 2] == EOI {
            return Some(i);
        }
        i += 1;
    }
    None
}
