//! JPEG marker constants used by the extractor and inspector.
//!
//! Only the markers this crate scans for are defined here. A full JPEG
//! segment walk is out of scope: frames are delimited purely by SOI/EOI
//! pairs, with one special case for a COM segment directly after SOI.

/// Start-of-image marker. Every JPEG frame begins with this pair.
pub const SOI: [u8; 2] = [0xFF, 0xD8];

/// End-of-image marker. Every JPEG frame ends with this pair.
pub const EOI: [u8; 2] = [0xFF, 0xD9];

/// Comment segment marker. Followed by a 2-byte big-endian length that
/// counts the two length bytes themselves (JPEG convention).
pub const COM: [u8; 2] = [0xFF, 0xFE];

/// Quantization table marker. The first segment of a typical camera JPEG,
/// so its presence right after SOI marks a frame with no leading comment.
pub const DQT: [u8; 2] = [0xFF, 0xDB];
