use bytes::Bytes;
use serde::{Serialize, Serializer};
use std::time::Duration;

/// One decoded SSE record.
///
/// Every field keeps the raw bytes from the wire. `None` means the field never
/// appeared in the record; `Some` with empty bytes means it appeared with no
/// content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Value for the EventSource's last event ID
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "lossy_utf8")]
    pub id: Option<Bytes>,

    /// Event type
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "lossy_utf8")]
    pub event: Option<Bytes>,

    /// Payload; repeated `data` lines are joined with `\n`
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "lossy_utf8")]
    pub data: Option<Bytes>,

    /// Reconnection time in milliseconds, unparsed
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "lossy_utf8")]
    pub retry: Option<Bytes>,
}

fn lossy_utf8<S: Serializer>(value: &Option<Bytes>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(bytes) => serializer.serialize_some(&String::from_utf8_lossy(bytes)),
        None => serializer.serialize_none(),
    }
}

fn as_str(value: &Option<Bytes>) -> Option<&str> {
    value.as_deref().and_then(|b| std::str::from_utf8(b).ok())
}

impl Event {
    pub fn id_str(&self) -> Option<&str> {
        as_str(&self.id)
    }

    pub fn event_str(&self) -> Option<&str> {
        as_str(&self.event)
    }

    pub fn data_str(&self) -> Option<&str> {
        as_str(&self.data)
    }

    /// `retry` as a duration. Anything other than plain ASCII digits is ignored.
    pub fn retry_duration(&self) -> Option<Duration> {
        let raw = self.retry.as_deref()?;
        if raw.is_empty() || !raw.iter().all(u8::is_ascii_digit) {
            return None;
        }
        std::str::from_utf8(raw)
            .ok()?
            .parse::<u64>()
            .ok()
            .map(Duration::from_millis)
    }

    /// True when no field is present
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.event.is_none() && self.data.is_none() && self.retry.is_none()
    }
}
