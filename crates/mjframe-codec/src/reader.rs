use std::io::{ErrorKind, Read};

use bytes::BytesMut;

use crate::codec::{decode_record, ContainerConfig};
use crate::error::{CodecError, Result};
use crate::extract::Frame;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads complete frames from any `Read` over a length-prefixed container.
///
/// Handles partial reads internally — callers always get complete frames.
pub struct ContainerReader<T> {
    inner: T,
    buf: BytesMut,
    config: ContainerConfig,
    position: usize,
    frames_read: usize,
}

impl<T: Read> ContainerReader<T> {
    /// Create a new container reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, ContainerConfig::default())
    }

    /// Create a new container reader with explicit configuration.
    pub fn with_config(inner: T, config: ContainerConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            position: 0,
            frames_read: 0,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Ok(None)` at a clean end of stream, meaning EOF landed
    /// exactly on a record boundary. EOF inside a record yields
    /// [`CodecError::TruncatedContainer`].
    pub fn read_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            let buffered = self.buf.len();
            if let Some(frame) = decode_record(&mut self.buf, self.config.max_frame_len)? {
                self.position += buffered - self.buf.len();
                self.frames_read += 1;
                return Ok(Some(frame));
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(CodecError::Io(err)),
            };

            if read == 0 {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                return Err(CodecError::TruncatedContainer {
                    trailing: self.buf.len(),
                });
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Container bytes consumed so far, headers included.
    ///
    /// Before a `read_frame` call this is the byte offset of the next
    /// record.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of frames decoded so far.
    pub fn frames_read(&self) -> usize {
        self.frames_read
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update the maximum frame length for subsequent records.
    pub fn set_max_frame_len(&mut self, max_frame_len: usize) {
        self.config.max_frame_len = max_frame_len;
    }

    /// Current reader configuration.
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }
}
