/// Errors that can occur during frame extraction or container decoding.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Extraction found no complete JPEG frame in the input.
    #[error("no JPEG frames found in input")]
    NoFramesFound,

    /// A container record does not begin with an ASCII digit.
    #[error("invalid container header (record starts with byte 0x{byte:02X})")]
    InvalidHeader { byte: u8 },

    /// A header digit run filled the whole scan window without terminating.
    #[error("container header runs past {max} digits")]
    HeaderTooLong { max: usize },

    /// A record declares a frame larger than the configured maximum.
    #[error("frame length {declared} exceeds maximum {max}")]
    FrameTooLarge { declared: usize, max: usize },

    /// The container ended in the middle of a record.
    #[error("container truncated mid-record ({trailing} trailing bytes)")]
    TruncatedContainer { trailing: usize },

    /// An I/O error occurred while reading a container stream.
    #[error("container I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
