use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{DecodeError, Result};
use crate::event::Event;

/// Accumulated `data` lines.
///
/// Most records carry a single `data` line, so the first value is kept as-is
/// and only copied into a growable buffer when a second line shows up.
#[derive(Debug, Default)]
enum DataBuffer {
    #[default]
    Unset,
    Single(Bytes),
    Joined(BytesMut),
}

impl DataBuffer {
    fn push(&mut self, content: Bytes) {
        match self {
            DataBuffer::Unset => *self = DataBuffer::Single(content),
            DataBuffer::Single(first) => {
                let mut joined = BytesMut::with_capacity(first.len() + 1 + content.len());
                joined.extend_from_slice(first);
                joined.put_u8(b'\n');
                joined.extend_from_slice(&content);
                *self = DataBuffer::Joined(joined);
            }
            DataBuffer::Joined(joined) => {
                joined.put_u8(b'\n');
                joined.extend_from_slice(&content);
            }
        }
    }

    fn freeze(self) -> Option<Bytes> {
        match self {
            DataBuffer::Unset => None,
            DataBuffer::Single(data) => Some(data),
            DataBuffer::Joined(data) => Some(data.freeze()),
        }
    }
}

/// In-progress record plus the per-line state machine that fills it.
#[derive(Debug, Default)]
pub(crate) struct EventBuilder {
    id: Option<Bytes>,
    event: Option<Bytes>,
    data: DataBuffer,
    retry: Option<Bytes>,
    // A field line was applied since the last dispatch
    touched: bool,
}

impl EventBuilder {
    /// Apply one framed line. Returns an outcome when the line completes a
    /// record or is malformed.
    pub(crate) fn add_line(&mut self, line: Bytes) -> Option<Result<Event>> {
        if line.is_empty() {
            return self.dispatch().map(Ok);
        }

        let colon = match line.iter().position(|&b| b == b':') {
            Some(0) => return None, // comment
            Some(pos) => pos,
            None => {
                tracing::debug!(line = %String::from_utf8_lossy(&line), "Skipping malformed SSE line");
                return Some(Err(DecodeError::InvalidSequence(line)));
            }
        };

        let content = trim(line.slice(colon + 1..));
        let field = &line[..colon];
        self.touched = true;

        if field.eq_ignore_ascii_case(b"id") {
            self.id = Some(content);
        } else if field.eq_ignore_ascii_case(b"event") {
            self.event = Some(content);
        } else if field.eq_ignore_ascii_case(b"data") {
            self.data.push(content);
        } else if field.eq_ignore_ascii_case(b"retry") {
            self.retry = Some(content);
        }
        None
    }

    /// Hand out the record if any field line touched it, resetting the builder.
    #[must_use]
    pub(crate) fn dispatch(&mut self) -> Option<Event> {
        if !self.touched {
            return None;
        }

        let EventBuilder {
            id,
            event,
            data,
            retry,
            ..
        } = std::mem::take(self);

        let event = Event {
            id,
            event,
            data: data.freeze(),
            retry,
        };
        tracing::trace!(
            has_id = event.id.is_some(),
            has_event = event.event.is_some(),
            data_len = event.data.as_ref().map(Bytes::len),
            "Dispatching SSE event"
        );
        Some(event)
    }
}

// Encoded length announced by a UTF-8 lead byte; 0 for continuation or invalid bytes
fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}

fn is_space(encoded: &[u8]) -> bool {
    std::str::from_utf8(encoded)
        .ok()
        .and_then(|s| s.chars().next())
        .is_some_and(char::is_whitespace)
}

// Width of the whitespace char opening `bytes`, 0 if there is none
fn leading_space(bytes: &[u8]) -> usize {
    let Some(&lead) = bytes.first() else {
        return 0;
    };
    let width = utf8_width(lead);
    if width == 0 || width > bytes.len() || !is_space(&bytes[..width]) {
        return 0;
    }
    width
}

// Width of the whitespace char closing `bytes`, 0 if there is none
fn trailing_space(bytes: &[u8]) -> usize {
    for width in 1..=bytes.len().min(4) {
        let start = bytes.len() - width;
        match utf8_width(bytes[start]) {
            0 => continue,
            w if w == width && is_space(&bytes[start..]) => return width,
            _ => return 0,
        }
    }
    0
}

/// Strips Unicode whitespace from both ends. Bytes that are not valid UTF-8
/// stop the trim and are kept.
fn trim(content: Bytes) -> Bytes {
    let mut start = 0;
    let mut end = content.len();
    while start < end {
        match leading_space(&content[start..end]) {
            0 => break,
            n => start += n,
        }
    }
    while start < end {
        match trailing_space(&content[start..end]) {
            0 => break,
            n => end -= n,
        }
    }
    content.slice(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(builder: &mut EventBuilder, line: &'static str) -> Option<Result<Event>> {
        builder.add_line(Bytes::from_static(line.as_bytes()))
    }

    fn event_from(lines: &[&'static str]) -> Event {
        let mut builder = EventBuilder::default();
        for &line in lines {
            assert!(feed(&mut builder, line).is_none(), "unexpected outcome for {line:?}");
        }
        feed(&mut builder, "").unwrap().unwrap()
    }

    #[test]
    fn test_blank_line_without_fields_emits_nothing() {
        let mut builder = EventBuilder::default();
        assert!(feed(&mut builder, "").is_none());
        assert!(feed(&mut builder, ": keep-alive").is_none());
        assert!(feed(&mut builder, "").is_none());
    }

    #[test]
    fn test_all_fields() {
        let event = event_from(&["id: 1", "event: message", "data: hello", "retry: 5000"]);
        assert_eq!(event.id.unwrap(), "1");
        assert_eq!(event.event.unwrap(), "message");
        assert_eq!(event.data.unwrap(), "hello");
        assert_eq!(event.retry.unwrap(), "5000");
    }

    #[test]
    fn test_data_lines_are_joined() {
        let event = event_from(&["data: a", "data:", "data:  c  "]);
        assert_eq!(event.data.unwrap(), "a\n\nc");
    }

    #[test]
    fn test_empty_data_is_present() {
        let event = event_from(&["data: "]);
        assert_eq!(event.data, Some(Bytes::new()));
        assert!(event.id.is_none());
    }

    #[test]
    fn test_field_names_ignore_case() {
        let event = event_from(&["ID: x", "Event: y", "DATA: z", "rEtRy: 1"]);
        assert_eq!(event.id.unwrap(), "x");
        assert_eq!(event.event.unwrap(), "y");
        assert_eq!(event.data.unwrap(), "z");
        assert_eq!(event.retry.unwrap(), "1");
    }

    #[test]
    fn test_unknown_field_marks_touched() {
        let event = event_from(&["foo: bar"]);
        assert!(event.is_empty());
    }

    #[test]
    fn test_malformed_line_leaves_record_untouched() {
        let mut builder = EventBuilder::default();
        let err = feed(&mut builder, "garbage").unwrap().unwrap_err();
        assert_eq!(err.line(), Some(&b"garbage"[..]));
        assert!(feed(&mut builder, "").is_none());
    }

    #[test]
    fn test_dispatch_resets_builder() {
        let mut builder = EventBuilder::default();
        assert!(feed(&mut builder, "id: 1").is_none());
        assert!(feed(&mut builder, "data: a").is_none());
        assert!(feed(&mut builder, "").is_some());

        assert!(feed(&mut builder, "data: b").is_none());
        let second = feed(&mut builder, "").unwrap().unwrap();
        assert!(second.id.is_none());
        assert_eq!(second.data.unwrap(), "b");
    }

    #[test]
    fn test_only_first_colon_splits() {
        let event = event_from(&["data: http://example.com:8080"]);
        assert_eq!(event.data.unwrap(), "http://example.com:8080");
    }

    #[test]
    fn test_trim() {
        assert_eq!(trim(Bytes::from_static(b" \t x y \r\x0B")), "x y");
        assert_eq!(trim(Bytes::from_static(b"   ")), "");
        assert_eq!(trim(Bytes::new()), "");
    }

    #[test]
    fn test_unicode_whitespace_is_trimmed() {
        let event = event_from(&["data: \u{a0}hello\u{3000}"]);
        assert_eq!(event.data_str(), Some("hello"));

        let spaced = "\u{85}\u{1680}\u{2000}\u{200a}x\u{2028}\u{2029}\u{202f}\u{205f}";
        assert_eq!(trim(Bytes::from_static(spaced.as_bytes())), "x");
        // zero-width space is not whitespace
        assert_eq!(trim(Bytes::from_static("\u{200b}x".as_bytes())), "\u{200b}x");
    }

    #[test]
    fn test_trim_keeps_invalid_utf8() {
        assert_eq!(trim(Bytes::from_static(b" \xff hi \xc2")), &b"\xff hi \xc2"[..]);
        // a lone continuation byte ends the trailing scan
        assert_eq!(trim(Bytes::from_static(b"\xa0 ")), &b"\xa0"[..]);
        // NBSP split by an invalid tail is not whitespace
        assert_eq!(trim(Bytes::from_static(b"a\xc2")), &b"a\xc2"[..]);
    }
}
