//! Safe structural parser.
//!
//! The single parsing entry point of the pipeline. It is total: a parse
//! failure is `None`, never an error value and never a panic, so the retry
//! logic upstream only ever branches on presence.

use serde_json::Value;
use tracing::debug;

/// Parse `text` as one complete JSON document.
///
/// Trailing non-whitespace after the document is a failure.
pub fn try_parse(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(
                "Candidate is not a JSON document ({} bytes): {}",
                text.len(),
                e
            );
            None
        }
    }
}
