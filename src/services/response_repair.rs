//! Recovers a JSON array of question objects from free-text model output.
//!
//! Model replies are frequently wrapped in markdown fences or prose, carry trailing
//! commas, or stop mid-object when the token budget runs out. `repair` normalizes the
//! text and, when the array is unterminated, cuts it back to the last complete object.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[A-Za-z0-9_-]*\s*").expect("CODE_FENCE is a valid regex pattern"));

static EMBEDDED_ARRAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\[\s*\{.*\}\s*\]").expect("EMBEDDED_ARRAY is a valid regex pattern")
});

static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([\]}])").expect("TRAILING_COMMA is a valid regex pattern"));

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("WHITESPACE_RUN is a valid regex pattern"));

static TRAILING_ELLIPSIS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.\.\.\s*$").expect("TRAILING_ELLIPSIS is a valid regex pattern")
});

#[derive(Debug, Error)]
pub enum RepairError {
    #[error("model reply is empty")]
    Empty,

    #[error("model reply is not valid JSON after repair: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("model reply is JSON but not an array")]
    NotAnArray,
}

/// Normalizes raw model output into text that should parse as a JSON array.
///
/// Text that already parses once fences and prose are gone is returned as is. Only a
/// trailing `...` is read as a truncation marker; ellipses inside strings are content.
pub fn repair(raw: &str) -> String {
    let mut text = CODE_FENCE.replace_all(raw.trim(), "").trim().to_string();

    if let Some(found) = EMBEDDED_ARRAY.find(&text) {
        text = found.as_str().to_string();
    }

    if serde_json::from_str::<Value>(&text).is_ok() {
        return text;
    }

    let text = TRAILING_COMMA.replace_all(&text, "$1");
    let text = TRAILING_ELLIPSIS.replace(&text, "\"");
    let text = WHITESPACE_RUN.replace_all(&text, " ").trim().to_string();

    if text.ends_with(']') {
        return text;
    }

    close_truncated_array(text)
}

/// Repairs `raw` and parses it, returning the array elements untouched.
pub fn parse_question_array(raw: &str) -> Result<Vec<Value>, RepairError> {
    if raw.trim().is_empty() {
        return Err(RepairError::Empty);
    }

    match serde_json::from_str::<Value>(&repair(raw))? {
        Value::Array(items) => Ok(items),
        _ => Err(RepairError::NotAnArray),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    InString,
    Escaped,
}

/// Truncates after the last object whose closing brace brings depth back to zero and
/// closes the array. Without any complete object a bare `]` is appended.
fn close_truncated_array(mut text: String) -> String {
    let mut state = ScanState::Normal;
    let mut depth: i64 = 0;
    let mut last_complete_end: Option<usize> = None;

    for (index, ch) in text.char_indices() {
        state = match (state, ch) {
            (ScanState::Escaped, _) => ScanState::InString,
            (ScanState::InString, '\\') => ScanState::Escaped,
            (ScanState::InString, '"') => ScanState::Normal,
            (ScanState::InString, _) => ScanState::InString,
            (ScanState::Normal, '"') => ScanState::InString,
            (ScanState::Normal, '{') => {
                depth += 1;
                ScanState::Normal
            }
            (ScanState::Normal, '}') => {
                depth -= 1;
                if depth == 0 {
                    last_complete_end = Some(index);
                }
                ScanState::Normal
            }
            (ScanState::Normal, _) => ScanState::Normal,
        };
    }

    match last_complete_end {
        Some(end) => text.truncate(end + 1),
        None => log::debug!("No complete object found in truncated model reply"),
    }
    text.push(']');
    text
}
