//! JPEG frame extraction and a length-prefixed container for MJPEG streams.
//!
//! Raw MJPEG is a bare concatenation of JPEG images with no index and no
//! lengths, so consumers must parse image markers just to find frame
//! boundaries. This crate converts such streams into a container where every
//! frame is prefixed with its size as zero-padded 5-digit ASCII decimal
//! (e.g. "06014"), which a player can dispatch with one header read per
//! frame:
//! - [`extract_frames`] carves complete frames out of raw bytes by SOI/EOI
//!   scanning, dropping a COM segment placed directly after SOI
//! - [`encode_container`] writes the length-prefixed records, falling back
//!   to wider headers for frames past 99999 bytes
//! - [`detect_format`] and [`probe_header`] identify which layout a buffer
//!   already uses
//! - [`ContainerReader`] streams frames back out of a container
//!
//! All parsing is pure and synchronous; nothing here produces output on its
//! own.

pub mod codec;
pub mod convert;
pub mod error;
pub mod extract;
pub mod inspect;
pub mod markers;
pub mod reader;

pub use codec::{
    decode_record, encode_container, encode_frame, header_for, header_width, ContainerConfig,
    EncodedContainer, OversizedFrame, DEFAULT_MAX_FRAME_LEN, HEADER_SCAN_WINDOW, HEADER_WIDTH,
    MAX_PREFIXED_LEN,
};
pub use convert::{convert, ConvertOutcome, ConvertReport};
pub use error::{CodecError, Result};
pub use extract::{extract_frames, Extraction, Frame, TruncatedTail};
pub use inspect::{detect_format, probe_header, HeaderProbe, StreamFormat};
pub use reader::ContainerReader;
