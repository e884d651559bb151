// src/application/normalizer.rs
//! Extraction of a JSON array embedded in free-form model output.
//!
//! Models wrap structured answers in prose, markdown fences or comments. The
//! slice between the first `[` and the last `]` is parsed strictly; when that
//! fails, a fixed pipeline of textual repairs runs over the slice and the
//! parse is attempted exactly once more.

use crate::domain::GenerationError;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, instrument, warn};

lazy_static! {
    static ref CODE_FENCE_REGEX: Regex =
        Regex::new(r"```(?:json|javascript)?").expect("Failed to compile code fence regex");
    static ref COMMENT_REGEX: Regex =
        Regex::new(r"//.*|(?s)/\*.*?\*/").expect("Failed to compile comment regex");
}

pub const NO_DELIMITERS: &str = "no array delimiters found";
pub const UNPARSEABLE: &str = "could not parse structured data from response";

/// Remove triple-backtick markers, optionally tagged `json` or `javascript`
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE_REGEX.replace_all(text, "").into_owned()
}

/// Remove `//` line comments and `/* */` block comments
pub fn strip_comments(text: &str) -> String {
    COMMENT_REGEX.replace_all(text, "").into_owned()
}

/// `\"` becomes `"`
pub fn unescape_quotes(text: &str) -> String {
    text.replace("\\\"", "\"")
}

/// A literal backslash-n becomes a single space
pub fn collapse_escaped_newlines(text: &str) -> String {
    text.replace("\\n", " ")
}

/// The full repair pipeline, in its fixed order
pub fn repair(text: &str) -> String {
    let text = strip_code_fences(text);
    let text = strip_comments(&text);
    let text = unescape_quotes(&text);
    let text = collapse_escaped_newlines(&text);
    text.trim().to_string()
}

/// Slice from the first `[` to the last `]`, inclusive and trimmed
pub fn array_slice(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if start >= end {
        return None;
    }
    Some(raw[start..=end].trim())
}

fn parse_non_empty(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) if !items.is_empty() => Some(items),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "Strict JSON parse failed");
            None
        }
    }
}

/// Extract a non-empty JSON array from `raw`.
///
/// `max_items` truncates the result; a shorter array is not an error.
#[instrument(level = "debug", skip(raw), fields(raw_len = raw.len()))]
pub fn extract_json_array(
    raw: &str,
    max_items: Option<usize>,
) -> Result<Vec<Value>, GenerationError> {
    let slice = array_slice(raw).ok_or_else(|| GenerationError::Parse(NO_DELIMITERS.to_string()))?;

    let mut items = match parse_non_empty(slice) {
        Some(items) => items,
        None => {
            let repaired = repair(slice);
            debug!(repaired_len = repaired.len(), "Retrying parse after repair");
            parse_non_empty(&repaired).ok_or_else(|| {
                warn!("Could not parse structured data from model response");
                GenerationError::Parse(UNPARSEABLE.to_string())
            })?
        }
    };

    if let Some(max) = max_items {
        items.truncate(max);
    }
    Ok(items)
}
