use futures::{Stream, StreamExt};
use std::pin::Pin;

use crate::builder::EventBuilder;
use crate::config::DecoderConfig;
use crate::error::{BoxError, DecodeError, Result};
use crate::event::Event;
use crate::line::LineBuffer;

/// Boxed stream of decode outcomes
pub type EventStream = Pin<Box<dyn Stream<Item = Result<Event>> + Send>>;

/// Decode a stream of byte chunks (e.g. an HTTP body) into SSE events.
///
/// Same outcomes as [`Decoder`](crate::Decoder). A chunk error ends the
/// stream: the pending record is flushed and the error comes last.
/// Dropping the returned stream stops decoding.
pub fn decode_stream<S, B, E>(stream: S) -> EventStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    decode_stream_with_config(stream, DecoderConfig::default())
}

pub fn decode_stream_with_config<S, B, E>(stream: S, config: DecoderConfig) -> EventStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut byte_chunks = Box::pin(stream);
        let mut lines = LineBuffer::new(&config);
        let mut builder = EventBuilder::default();
        let mut failure = None;

        'chunks: while let Some(chunk_result) = byte_chunks.next().await {
            match chunk_result {
                Ok(bytes) => {
                    lines.extend(bytes.as_ref());

                    // Process all complete lines in buffer
                    while let Some(line_result) = lines.next_line() {
                        match line_result {
                            Ok(line) => {
                                if let Some(outcome) = builder.add_line(line) {
                                    yield outcome;
                                }
                            }
                            Err(e) => {
                                failure = Some(e);
                                break 'chunks;
                            }
                        }
                    }
                }
                Err(e) => {
                    let e: BoxError = e.into();
                    tracing::warn!(error = %e, "SSE chunk stream failed");
                    failure = Some(DecodeError::Transport(e));
                    break;
                }
            }
        }

        // An over-long tail is discarded, anything else is a final line
        if !matches!(failure, Some(DecodeError::LineTooLong { .. })) {
            if let Some(line) = lines.finish() {
                if let Some(outcome) = builder.add_line(line) {
                    yield outcome;
                }
            }
        }

        if let Some(event) = builder.dispatch() {
            yield Ok(event);
        }

        if let Some(e) = failure {
            yield Err(e);
        }
    })
}
