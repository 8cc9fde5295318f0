//! # sse-decode
//!
//! Streaming decoder for the Server-Sent Events wire format.
//!
//! Bytes go in, [`Event`] records come out, one per blank-line terminated group of
//! field lines (plus a trailing group at end of input). Comment lines are skipped,
//! malformed lines are reported as [`DecodeError::InvalidSequence`] without stopping
//! the decode, and a failing source ends it with one final error.
//!
//! Three ways to drive it:
//!
//! - [`Decoder`]: blocking pull iterator over any [`std::io::BufRead`]
//! - [`read`]: callback with per-outcome continue/stop control
//! - [`decode_stream`]: async adapter over a stream of byte chunks
//!
//! ## Quick Start
//!
//! ```rust
//! use sse_decode::Decoder;
//!
//! let input = "id: 1\nevent: greeting\ndata: hello\ndata: world\n\n";
//!
//! for outcome in Decoder::new(input.as_bytes()) {
//!     match outcome {
//!         Ok(event) => assert_eq!(event.data_str(), Some("hello\nworld")),
//!         Err(e) => eprintln!("skipping: {}", e),
//!     }
//! }
//! ```
//!
//! No transport lives here: reconnecting, honoring `retry` and tracking the last
//! event ID are left to the caller.

mod builder;
pub mod config;
pub mod decoder;
pub mod error;
pub mod event;
pub mod line;
pub mod stream;

pub use config::DecoderConfig;
pub use decoder::{read, read_with_config, Decoder};
pub use error::{BoxError, DecodeError, Result};
pub use event::Event;
pub use line::LineBuffer;
pub use stream::{decode_stream, decode_stream_with_config, EventStream};
