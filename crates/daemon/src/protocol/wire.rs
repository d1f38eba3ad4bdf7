// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line-delimited JSON framing over the WebSocket text channel (spec.md §6).

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("malformed JSON frame: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

/// Parse one incoming text frame as `T`. A frame is expected to be a single
/// JSON object; trailing/leading whitespace (including a newline some
/// clients send) is tolerated.
pub fn decode<T: DeserializeOwned>(frame: &str) -> Result<T, WireError> {
    serde_json::from_str(frame.trim()).map_err(WireError::from)
}

/// Serialize `T` as one line-delimited JSON frame (a trailing `\n`).
pub fn encode<T: Serialize>(value: &T) -> Result<String, WireError> {
    let mut text = serde_json::to_string(value)?;
    text.push('\n');
    Ok(text)
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;

