// Decode an SSE stream from stdin and print each event as a JSON line.
//
// Usage:
//   curl -sN https://example.com/events | cargo run --example decode_stdin
//   SSE_MAX_LINE_LEN=1024 RUST_LOG=sse_decode=debug cargo run --example decode_stdin < dump.txt

use anyhow::{Context, Result};
use sse_decode::{Decoder, DecoderConfig};
use std::io::Write;
use tracing_subscriber::EnvFilter;

fn load_config() -> Result<DecoderConfig> {
    let mut config = DecoderConfig::default();
    if let Ok(raw) = std::env::var("SSE_MAX_LINE_LEN") {
        let max_line_len = raw
            .parse()
            .with_context(|| format!("SSE_MAX_LINE_LEN must be a byte count, got {:?}", raw))?;
        config = config.with_max_line_len(max_line_len);
    }
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = load_config()?;
    tracing::info!("Decoding SSE from stdin (max line {} bytes)", config.max_line_len);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    let mut events = 0usize;

    for outcome in Decoder::with_config(stdin.lock(), config) {
        match outcome {
            Ok(event) => {
                events += 1;
                serde_json::to_writer(&mut stdout, &event)?;
                writeln!(stdout)?;
            }
            Err(e) if e.is_fatal() => return Err(e).context("SSE stream ended with an error"),
            Err(e) => tracing::warn!("{}", e),
        }
    }

    tracing::info!("Decoded {} events", events);
    Ok(())
}
