// Decoder configuration
// Only line framing is tunable; field interpretation has no knobs.

use serde::{Deserialize, Serialize};

/// Default line buffer size (64 KiB). A line must fit together with its `\n`,
/// so the longest accepted line is one byte shorter.
pub const DEFAULT_MAX_LINE_LEN: usize = 64 * 1024;

/// Initial capacity of the line buffer
pub const DEFAULT_INITIAL_CAPACITY: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Bytes available for one line including its terminator; a line that
    /// does not fit ends the decode with
    /// [`DecodeError::LineTooLong`](crate::DecodeError::LineTooLong)
    pub max_line_len: usize,
    pub initial_capacity: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_line_len: DEFAULT_MAX_LINE_LEN,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

impl DecoderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len;
        self
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DecoderConfig::default();
        assert_eq!(config.max_line_len, 65536);
        assert_eq!(config.initial_capacity, 4096);
    }

    #[test]
    fn test_partial_deserialization_keeps_defaults() {
        let config: DecoderConfig = serde_json::from_str(r#"{"max_line_len":128}"#).unwrap();
        assert_eq!(config.max_line_len, 128);
        assert_eq!(config.initial_capacity, DEFAULT_INITIAL_CAPACITY);
    }

    #[test]
    fn test_builder_methods() {
        let config = DecoderConfig::new()
            .with_max_line_len(16)
            .with_initial_capacity(32);
        assert_eq!(config, DecoderConfig { max_line_len: 16, initial_capacity: 32 });
    }
}
