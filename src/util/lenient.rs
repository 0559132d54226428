//! Forgiving field decoders for model-written JSON.
//!
//! Models routinely return `"12"` where a number was asked for, or a single
//! string where the template asked for a list. These decoders accept the
//! common variations instead of failing the whole item.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Nested record that a model may collapse into a single string.
pub trait FromText: Default {
    /// Build the record from a bare string; the default keeps only defaults.
    fn from_text(text: String) -> Self {
        let _ = text;
        Self::default()
    }
}

fn scalar_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Array(items) => items
            .into_iter()
            .map(scalar_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// Any scalar as text; `null` becomes empty.
pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(scalar_text)
}

/// Like [`string`], but `null` and blank text become `None`.
pub fn opt_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let text = scalar_text(Value::deserialize(deserializer)?);
    Ok((!text.trim().is_empty()).then_some(text))
}

/// Non-negative integer from a number or the leading digits of a string
/// (`"500 ryo"` → 500). Anything else decodes as 0.
pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .unwrap_or(0),
        Value::String(s) => s
            .trim()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect::<String>()
            .parse()
            .unwrap_or(0),
        _ => 0,
    })
}

/// List of strings; a bare string becomes a one-element list.
pub fn string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(scalar_text)
            .filter(|s| !s.trim().is_empty())
            .collect(),
        Value::Null => Vec::new(),
        other => {
            let text = scalar_text(other);
            if text.trim().is_empty() {
                Vec::new()
            } else {
                vec![text]
            }
        }
    })
}

fn loose_record<T: DeserializeOwned + FromText>(value: Value) -> T {
    match value {
        Value::Object(_) => T::deserialize(value).unwrap_or_default(),
        Value::Null => T::default(),
        Value::Array(items) => items.into_iter().next().map(loose_record).unwrap_or_default(),
        other => {
            let text = scalar_text(other);
            if text.trim().is_empty() {
                T::default()
            } else {
                T::from_text(text)
            }
        }
    }
}

/// Nested object; a bare string goes through [`FromText`] and any other
/// mismatch decodes as the default record.
pub fn record<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + FromText,
{
    Value::deserialize(deserializer).map(loose_record)
}

/// List of nested objects; a single object or string becomes a one-element list.
pub fn record_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + FromText,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(loose_record)
            .collect(),
        Value::Null => Vec::new(),
        Value::String(s) if s.trim().is_empty() => Vec::new(),
        other @ (Value::Object(_) | Value::String(_)) => vec![loose_record(other)],
        _ => Vec::new(),
    })
}
