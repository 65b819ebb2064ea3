//! Response envelope handling.
//!
//! Most endpoints wrap their payload in a single-key object
//! (`{"pipelines": [...]}`, `{"lead": {...}}`); a few answer with the bare
//! entity. Both shapes are accepted.

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

/// Extracts `key` from an envelope object, or decodes the whole body when
/// the key is absent.
pub(crate) fn unwrap_field<T: DeserializeOwned>(
    body: JsonValue,
    key: &str,
) -> Result<T, serde_json::Error> {
    match body {
        JsonValue::Object(mut map) if map.contains_key(key) => {
            serde_json::from_value(map.remove(key).unwrap_or(JsonValue::Null))
        }
        other => serde_json::from_value(other),
    }
}

/// Reads the human-readable failure text from an error body.
pub(crate) fn error_message(body: &JsonValue) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(JsonValue::as_str))
        .map(str::to_string)
}
