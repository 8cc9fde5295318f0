use bytes::{Buf, Bytes, BytesMut};

use crate::config::DecoderConfig;
use crate::error::{DecodeError, Result};

const LF: u8 = b'\n';
const CR: u8 = b'\r';

/// Line framing over pushed byte chunks.
///
/// Lines end at `\n`; a single `\r` right before it is dropped as well.
/// Returned lines never include the terminator. A line and its terminator
/// together must fit in `max_line_len` bytes.
#[derive(Debug)]
pub struct LineBuffer {
    buffer: BytesMut,
    // Bytes at the front of `buffer` already known to contain no `\n`
    scanned: usize,
    max_line_len: usize,
}

impl LineBuffer {
    pub fn new(config: &DecoderConfig) -> Self {
        Self {
            buffer: BytesMut::with_capacity(config.initial_capacity),
            scanned: 0,
            max_line_len: config.max_line_len,
        }
    }

    /// Add bytes to the buffer
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Extract next complete line from the buffer.
    ///
    /// Returns `None` if more input is needed, or an error once the pending
    /// line can no longer fit the configured limit.
    pub fn next_line(&mut self) -> Option<Result<Bytes>> {
        let found = self.buffer[self.scanned..]
            .iter()
            .position(|&b| b == LF)
            .map(|pos| self.scanned + pos);

        let Some(newline_pos) = found else {
            self.scanned = self.buffer.len();
            // no room left for the `\n`
            if self.buffer.len() >= self.max_line_len {
                return Some(Err(self.too_long()));
            }
            return None;
        };

        if newline_pos >= self.max_line_len {
            return Some(Err(self.too_long()));
        }

        let mut line = self.buffer.split_to(newline_pos).freeze();
        self.buffer.advance(1);
        self.scanned = 0;

        if line.last() == Some(&CR) {
            line.truncate(line.len() - 1);
        }
        Some(Ok(line))
    }

    /// Take whatever is left after the input ended as a final, unterminated line.
    pub fn finish(&mut self) -> Option<Bytes> {
        if self.buffer.is_empty() {
            return None;
        }
        self.scanned = 0;
        let mut line = self.buffer.split().freeze();
        if line.last() == Some(&CR) {
            line.truncate(line.len() - 1);
        }
        Some(line)
    }

    /// Current buffer size
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn too_long(&self) -> DecodeError {
        tracing::warn!(limit = self.max_line_len, "SSE line exceeds maximum length");
        DecodeError::LineTooLong {
            limit: self.max_line_len,
        }
    }
}
