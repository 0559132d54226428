//! Pull the first JSON value out of free-form model text.
//!
//! Order of preference: a fenced code block (optionally tagged `json`), then
//! the first `{` (or the first `[` when the text has no `{`) up to the point
//! where bracket depth returns to zero.
//!
//! The depth scan counts `{`/`[` as openers and `}`/`]` as closers without
//! matching bracket types. It tolerates sloppy nesting and may hand the
//! parser a slice that a type-matching scanner would have cut differently;
//! the final `serde_json` parse is the arbiter. Brackets inside string
//! literals are not counted.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::error::{ForgeError, Result};

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)\s*```").expect("fence pattern is valid")
    })
}

/// Extract and parse the first JSON value embedded in `text`.
pub fn extract_json(text: &str) -> Result<Value> {
    let candidate = candidate(text);
    serde_json::from_str(candidate).map_err(|e| ForgeError::malformed(e.to_string(), text))
}

/// Like [`extract_json`], but only accepts a JSON object.
pub fn extract_object(text: &str) -> Result<serde_json::Map<String, Value>> {
    match extract_json(text)? {
        Value::Object(map) => Ok(map),
        other => Err(ForgeError::malformed(
            format!("expected a JSON object, found {}", kind(&other)),
            text,
        )),
    }
}

fn candidate(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(inner) = fence_pattern().captures(trimmed).and_then(|c| c.get(1)) {
        return inner.as_str();
    }
    balanced_slice(trimmed).unwrap_or(trimmed)
}

/// Slice from the first opener to the point where depth returns to zero.
///
/// Objects win over arrays: prose such as `[veja abaixo]` before the object
/// must not capture the scan.
fn balanced_slice(text: &str) -> Option<&str> {
    let start = text.find('{').or_else(|| text.find('['))?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
