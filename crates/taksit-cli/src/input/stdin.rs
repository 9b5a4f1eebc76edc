use serde_json::Value;
use std::io::{self, Read};
use tracing::debug;

/// Read piped JSON from stdin. Returns None when stdin is a terminal or the
/// pipe is empty, so the caller falls back to flags.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        debug!("stdin is piped but empty; using flags");
        return Ok(None);
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse JSON from stdin: {e}"))?;
    Ok(Some(value))
}
