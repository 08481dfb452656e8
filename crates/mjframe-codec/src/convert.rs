use bytes::Bytes;
use tracing::{debug, warn};

use crate::codec::{encode_container, OversizedFrame, MAX_PREFIXED_LEN};
use crate::error::{CodecError, Result};
use crate::extract::{extract_frames, Frame, TruncatedTail};
use crate::inspect::{detect_format, probe_header, HeaderProbe, StreamFormat};

/// Facts gathered while converting one raw stream.
#[derive(Debug, Clone)]
pub struct ConvertReport {
    /// Input size in bytes.
    pub input_len: usize,
    /// Container size in bytes.
    pub output_len: usize,
    /// Number of frames extracted and encoded.
    pub frame_count: usize,
    /// Per-frame sizes, in stream order.
    pub frame_sizes: Vec<usize>,
    /// Frames that required a wider-than-preferred header.
    pub oversized: Vec<OversizedFrame>,
    /// A trailing unterminated frame dropped during extraction.
    pub truncated_tail: Option<TruncatedTail>,
    /// Post-encode verification of the container's first header.
    pub header: Option<HeaderProbe>,
}

/// Result of a conversion request.
#[derive(Debug, Clone)]
pub enum ConvertOutcome {
    /// The input is already length-prefixed; nothing to do.
    AlreadyPrefixed,
    /// The input was converted.
    Converted {
        /// The encoded container.
        container: Bytes,
        /// Diagnostic facts for reporting.
        report: ConvertReport,
    },
}

/// Convert raw MJPEG bytes into a length-prefixed container.
///
/// Already-prefixed input is a reported no-op, never an error. Input with
/// no complete frame yields [`CodecError::NoFramesFound`] and no buffer.
/// Oversized frames and a truncated tail are warnings carried in the
/// report; they never block encoding.
pub fn convert(data: &[u8]) -> Result<ConvertOutcome> {
    if detect_format(data) == StreamFormat::LengthPrefixed {
        debug!(input_len = data.len(), "input is already length-prefixed");
        return Ok(ConvertOutcome::AlreadyPrefixed);
    }

    let extraction = extract_frames(data);
    if let Some(tail) = extraction.truncated_tail {
        warn!(
            offset = tail.offset,
            len = tail.len,
            "dropped unterminated trailing frame"
        );
    }
    if extraction.frames.is_empty() {
        return Err(CodecError::NoFramesFound);
    }

    let encoded = encode_container(&extraction.frames);
    if !encoded.oversized.is_empty() {
        warn!(
            count = encoded.oversized.len(),
            limit = MAX_PREFIXED_LEN,
            "frames exceed the preferred header range, using variable-width headers"
        );
    }

    let report = ConvertReport {
        input_len: data.len(),
        output_len: encoded.bytes.len(),
        frame_count: extraction.frames.len(),
        frame_sizes: extraction.frames.iter().map(Frame::len).collect(),
        header: probe_header(&encoded.bytes),
        oversized: encoded.oversized,
        truncated_tail: extraction.truncated_tail,
    };
    debug!(
        frames = report.frame_count,
        output_len = report.output_len,
        "conversion complete"
    );

    Ok(ConvertOutcome::Converted {
        container: encoded.bytes,
        report,
    })
}
