use crate::errors::DrugInfoError;
use serde_json::{Map, Value};

/// Wraps any decoded body into a mapping: objects pass through, everything
/// else lands under `data`.
pub fn into_mapping(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    }
}

fn text_mapping(text: &str) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("text".to_string(), Value::String(text.to_string()));
    map
}

/// Turns a raw HTTP status and body into the mapping handed to callers.
///
/// 401 is always `Unauthorized`, whatever the body says. Other non-2xx
/// statuses carry the decoded body (or `{"text": ...}`) in the error.
pub fn normalize_response(status: u16, body: &str) -> Result<Map<String, Value>, DrugInfoError> {
    if status == 401 {
        return Err(DrugInfoError::Unauthorized);
    }
    let parsed = serde_json::from_str::<Value>(body).ok();
    if !(200..300).contains(&status) {
        let body = parsed.unwrap_or_else(|| Value::Object(text_mapping(body)));
        return Err(DrugInfoError::Http { status, body });
    }
    Ok(match parsed {
        Some(value) => into_mapping(value),
        None => text_mapping(body),
    })
}
