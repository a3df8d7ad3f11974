//! Maps tool arguments onto the wire: query pairs, path identifiers,
//! request bodies and timeouts.

use crate::constants::api::{DEFAULT_CONTENT_TYPE, FORM_CONTENT_TYPE};
use crate::druginfo::endpoints::{Endpoint, ParamKind};
use crate::errors::DrugInfoError;
use serde_json::{Map, Value};
use std::time::Duration;

static EMPTY: once_cell::sync::Lazy<Map<String, Value>> = once_cell::sync::Lazy::new(Map::new);

/// Request body ready to send, with the content type it was encoded for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub content_type: String,
    pub payload: String,
}

pub(crate) fn args_object(args: &Value) -> Result<&Map<String, Value>, DrugInfoError> {
    match args {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(&*EMPTY),
        _ => Err(DrugInfoError::invalid_argument("arguments must be an object")),
    }
}

fn present<'a>(args: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    args.get(key).filter(|v| !v.is_null())
}

fn coerce_int(value: &Value, label: &str) -> Result<i64, DrugInfoError> {
    let parsed = match value {
        Value::Number(num) => num.as_i64().or_else(|| {
            num.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| DrugInfoError::invalid_argument(format!("{} must be an integer", label)))
}

fn coerce_bool(value: &Value, label: &str) -> Result<bool, DrugInfoError> {
    match value {
        Value::Bool(flag) => Ok(*flag),
        Value::String(text) => match text.trim().to_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(DrugInfoError::invalid_argument(format!(
                "{} must be a boolean",
                label
            ))),
        },
        _ => Err(DrugInfoError::invalid_argument(format!(
            "{} must be a boolean",
            label
        ))),
    }
}

/// Renders one value for the query string. Booleans always become the
/// literal strings `true`/`false`.
pub fn render_value(value: &Value, kind: ParamKind, label: &str) -> Result<String, DrugInfoError> {
    match kind {
        ParamKind::Bool => Ok(if coerce_bool(value, label)? {
            "true".to_string()
        } else {
            "false".to_string()
        }),
        ParamKind::Int => Ok(coerce_int(value, label)?.to_string()),
        ParamKind::Str => Ok(value
            .as_str()
            .map(|s| s.to_string())
            .unwrap_or_else(|| value.to_string())),
    }
}

/// Builds the ordered query pairs for `endpoint` from `args`.
///
/// Unset (absent or null) arguments are skipped. Alias rules run after the
/// canonical parameters and never replace a wire name that is already set.
pub fn build_query(endpoint: &Endpoint, args: &Value) -> Result<Vec<(String, String)>, DrugInfoError> {
    let args = args_object(args)?;
    let mut pairs: Vec<(String, String)> = Vec::new();

    for spec in endpoint.query {
        let Some(value) = present(args, spec.arg) else {
            continue;
        };
        pairs.push((spec.wire.to_string(), render_value(value, spec.kind, spec.arg)?));
    }

    for rule in endpoint.aliases {
        let Some(value) = present(args, rule.alias) else {
            continue;
        };
        if pairs.iter().any(|(name, _)| name == rule.canonical) {
            continue;
        }
        pairs.push((
            rule.canonical.to_string(),
            render_value(value, rule.kind, rule.alias)?,
        ));
    }

    Ok(pairs)
}

/// Returns the rendered path identifier, or a caller error when the endpoint
/// needs one and it is missing or empty. Whitespace is sent as given.
pub fn path_identifier(endpoint: &Endpoint, args: &Value) -> Result<Option<String>, DrugInfoError> {
    let Some(param) = endpoint.path_param else {
        return Ok(None);
    };
    let args = args_object(args)?;
    let missing = || DrugInfoError::invalid_argument(format!("{} is required", param.arg));
    let value = present(args, param.arg).ok_or_else(missing)?;
    let rendered = match param.kind {
        ParamKind::Int => {
            if value.as_str().map(str::is_empty).unwrap_or(false) {
                return Err(missing());
            }
            coerce_int(value, param.arg)?.to_string()
        }
        _ => render_value(value, param.kind, param.arg)?,
    };
    if rendered.is_empty() {
        return Err(missing());
    }
    Ok(Some(rendered))
}

/// Per-call timeout from the `timeout` argument (seconds), falling back to
/// the endpoint default.
pub fn resolve_timeout(endpoint: &Endpoint, args: &Value) -> Result<Duration, DrugInfoError> {
    let args = args_object(args)?;
    let Some(value) = present(args, "timeout") else {
        return Ok(Duration::from_secs(endpoint.default_timeout_s));
    };
    let seconds = coerce_int(value, "timeout")?;
    if seconds < 1 {
        return Err(DrugInfoError::invalid_argument(
            "timeout must be at least 1 second",
        ));
    }
    Ok(Duration::from_secs(seconds as u64))
}

fn content_type_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

fn form_field(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn to_json_text(body: &Value) -> Result<String, DrugInfoError> {
    serde_json::to_string(body)
        .map_err(|err| DrugInfoError::invalid_argument(format!("body is not serializable: {}", err)))
}

/// Encodes `body` according to `contentType` (default JSON). Returns `None`
/// for endpoints that take no body.
pub fn encode_body(endpoint: &Endpoint, args: &Value) -> Result<Option<EncodedBody>, DrugInfoError> {
    if !endpoint.body {
        return Ok(None);
    }
    let args = args_object(args)?;
    let body = present(args, "body")
        .ok_or_else(|| DrugInfoError::invalid_argument("body is required"))?;
    let content_type = present(args, "contentType")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();
    let essence = content_type_essence(&content_type);

    let payload = if essence == DEFAULT_CONTENT_TYPE || essence.ends_with("+json") {
        to_json_text(body)?
    } else if essence == FORM_CONTENT_TYPE {
        let Some(fields) = body.as_object() else {
            return Err(DrugInfoError::invalid_argument(
                "body must be an object for form encoding",
            ));
        };
        let pairs: Vec<(String, String)> = fields
            .iter()
            .filter_map(|(key, value)| form_field(value).map(|v| (key.clone(), v)))
            .collect();
        serde_urlencoded::to_string(pairs)
            .map_err(|err| DrugInfoError::invalid_argument(format!("body is not form-encodable: {}", err)))?
    } else if let Some(text) = body.as_str() {
        text.to_string()
    } else {
        to_json_text(body)?
    };

    Ok(Some(EncodedBody {
        content_type,
        payload,
    }))
}
