//! Decoding backend replies into filter specifications

use super::FilterSpec;
use crate::error::FilterDecodeError;

/// Decode raw reply text as a JSON object of column/value constraints.
///
/// Anything other than a single JSON object fails, carrying the raw text.
pub fn parse_filter_spec(text: &str) -> Result<FilterSpec, FilterDecodeError> {
    let decoded: serde_json::Value =
        serde_json::from_str(text).map_err(|err| FilterDecodeError {
            text: text.to_string(),
            reason: err.to_string(),
        })?;

    match decoded {
        serde_json::Value::Object(map) => Ok(FilterSpec::from(map)),
        other => Err(FilterDecodeError {
            text: text.to_string(),
            reason: format!("expected a JSON object, found {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
