use std::io::{BufRead, ErrorKind};
use std::iter::FusedIterator;
use std::ops::ControlFlow;

use crate::builder::EventBuilder;
use crate::config::DecoderConfig;
use crate::error::{DecodeError, Result};
use crate::event::Event;
use crate::line::LineBuffer;

#[derive(Debug)]
enum State {
    Reading,
    /// Input is over; the pending record still has to be flushed
    Flushing(Option<DecodeError>),
    /// Only the terminal error (if any) is left
    Failing(Option<DecodeError>),
    Done,
}

/// Blocking SSE decoder over a [`BufRead`].
///
/// Yields one item per outcome: `Ok(event)` for every completed record and
/// `Err(_)` for malformed lines (decoding goes on) or a read failure (last
/// item). Nothing is read until [`Iterator::next`] is called, so dropping the
/// decoder stops it.
#[derive(Debug)]
pub struct Decoder<R> {
    reader: R,
    lines: LineBuffer,
    builder: EventBuilder,
    state: State,
}

impl<R: BufRead> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, DecoderConfig::default())
    }

    pub fn with_config(reader: R, config: DecoderConfig) -> Self {
        Self {
            reader,
            lines: LineBuffer::new(&config),
            builder: EventBuilder::default(),
            state: State::Reading,
        }
    }

    /// Give back the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }

    // Moves one chunk from the reader into the line buffer; `Ok(0)` at end of input
    fn fill(&mut self) -> std::io::Result<usize> {
        loop {
            let chunk = match self.reader.fill_buf() {
                Ok(chunk) => chunk,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            let len = chunk.len();
            self.lines.extend(chunk);
            self.reader.consume(len);
            return Ok(len);
        }
    }

    fn read_next(&mut self) -> Option<Result<Event>> {
        loop {
            match self.lines.next_line() {
                Some(Ok(line)) => {
                    if let Some(outcome) = self.builder.add_line(line) {
                        return Some(outcome);
                    }
                    continue;
                }
                Some(Err(e)) => {
                    self.state = State::Flushing(Some(e));
                    return None;
                }
                None => {}
            }

            match self.fill() {
                Ok(0) => {
                    self.state = State::Flushing(None);
                    return self.finish_line();
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "SSE source read failed");
                    self.state = State::Flushing(Some(DecodeError::Io(e)));
                    return self.finish_line();
                }
            }
        }
    }

    // The unterminated tail is still a line; it can only be malformed or a field
    fn finish_line(&mut self) -> Option<Result<Event>> {
        let line = self.lines.finish()?;
        self.builder.add_line(line)
    }
}

impl<R: BufRead> Iterator for Decoder<R> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match std::mem::replace(&mut self.state, State::Done) {
                State::Reading => {
                    self.state = State::Reading;
                    if let Some(outcome) = self.read_next() {
                        return Some(outcome);
                    }
                }
                State::Flushing(failure) => {
                    self.state = State::Failing(failure);
                    if let Some(event) = self.builder.dispatch() {
                        return Some(Ok(event));
                    }
                }
                State::Failing(failure) => return failure.map(Err),
                State::Done => return None,
            }
        }
    }
}

impl<R: BufRead> FusedIterator for Decoder<R> {}

/// Decode `input`, handing every outcome to `f` until it returns
/// [`ControlFlow::Break`] or the input is exhausted.
///
/// Returns `Break` if decoding was stopped early.
pub fn read<R, F>(input: R, f: F) -> ControlFlow<()>
where
    R: BufRead,
    F: FnMut(Result<Event>) -> ControlFlow<()>,
{
    read_with_config(input, DecoderConfig::default(), f)
}

pub fn read_with_config<R, F>(input: R, config: DecoderConfig, mut f: F) -> ControlFlow<()>
where
    R: BufRead,
    F: FnMut(Result<Event>) -> ControlFlow<()>,
{
    for outcome in Decoder::with_config(input, config) {
        f(outcome)?;
    }
    ControlFlow::Continue(())
}
