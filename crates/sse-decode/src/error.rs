use bytes::Bytes;
use thiserror::Error;

/// Boxed error coming from an async chunk source
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum DecodeError {
    /// Non-blank, non-comment line without a `:` separator. Decoding continues.
    #[error("invalid event sequence: {:?}", String::from_utf8_lossy(.0))]
    InvalidSequence(Bytes),

    #[error("line exceeds maximum length of {limit} bytes")]
    LineTooLong { limit: usize },

    #[error("stream read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transport error: {0}")]
    Transport(#[source] BoxError),
}

impl DecodeError {
    /// Whether this outcome ends the decode.
    ///
    /// Only malformed lines are recoverable; everything else is the last item
    /// a decoder produces.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, DecodeError::InvalidSequence(_))
    }

    /// The offending line of a malformed-line error
    pub fn line(&self) -> Option<&[u8]> {
        match self {
            DecodeError::InvalidSequence(line) => Some(line),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
