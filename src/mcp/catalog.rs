use crate::constants::limits::SUGGESTION_LIMIT;
use crate::druginfo::endpoints::{endpoints, Endpoint, ParamKind};
use crate::errors::ToolError;
use crate::utils::suggest::suggest;
use crate::utils::tool_errors::unknown_field_error;
use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Value>,
}

static TOOL_CATALOG: Lazy<Vec<ToolDef>> = Lazy::new(|| endpoints().iter().map(tool_def).collect());

static TOOL_MAP: Lazy<HashMap<String, ToolDef>> = Lazy::new(|| {
    TOOL_CATALOG
        .iter()
        .cloned()
        .map(|tool| (tool.name.clone(), tool))
        .collect()
});

static TOOL_VALIDATORS: Lazy<HashMap<String, JSONSchema>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for tool in TOOL_CATALOG.iter() {
        if let Ok(schema) = JSONSchema::compile(&tool.input_schema) {
            map.insert(tool.name.clone(), schema);
        }
    }
    map
});

pub fn tool_catalog() -> &'static Vec<ToolDef> {
    &TOOL_CATALOG
}

pub fn tool_by_name(name: &str) -> Option<&'static ToolDef> {
    TOOL_MAP.get(name)
}

fn kind_schema(kind: ParamKind) -> Value {
    match kind {
        ParamKind::Str => json!({"type": ["string", "null"]}),
        ParamKind::Int => json!({"type": ["integer", "string", "null"]}),
        ParamKind::Bool => json!({"type": ["boolean", "string", "null"]}),
    }
}

fn described(mut schema: Value, description: String) -> Value {
    if let Some(obj) = schema.as_object_mut() {
        obj.insert("description".to_string(), Value::String(description));
    }
    schema
}

pub fn input_schema(endpoint: &Endpoint) -> Value {
    let mut properties = Map::new();
    let mut required: Vec<&str> = Vec::new();

    if let Some(param) = endpoint.path_param {
        let schema = match param.kind {
            ParamKind::Int => json!({"type": ["integer", "string"]}),
            _ => json!({"type": "string"}),
        };
        properties.insert(
            param.arg.to_string(),
            described(schema, format!("Path identifier ({}).", param.arg)),
        );
        required.push(param.arg);
    }

    for spec in endpoint.query {
        let schema = kind_schema(spec.kind);
        let schema = if spec.arg == spec.wire {
            schema
        } else {
            described(schema, format!("Sent as `{}`.", spec.wire))
        };
        properties.insert(spec.arg.to_string(), schema);
    }

    for rule in endpoint.aliases {
        properties.insert(
            rule.alias.to_string(),
            described(
                kind_schema(rule.kind),
                format!("Legacy alias for `{}`; ignored when that is set.", rule.canonical),
            ),
        );
    }

    if endpoint.body {
        properties.insert(
            "body".to_string(),
            json!({
                "type": ["object", "array", "string"],
                "description": "Request payload. Strings are sent verbatim for non-JSON content types."
            }),
        );
        properties.insert(
            "contentType".to_string(),
            json!({
                "type": ["string", "null"],
                "description": "Body content type (default application/json)."
            }),
        );
        required.push("body");
    }

    properties.insert(
        "timeout".to_string(),
        json!({
            "type": ["integer", "string"],
            "description": format!("Request timeout in seconds (default {}).", endpoint.default_timeout_s)
        }),
    );

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn tool_def(endpoint: &Endpoint) -> ToolDef {
    ToolDef {
        name: endpoint.tool_name(),
        description: endpoint.description.to_string(),
        input_schema: input_schema(endpoint),
        annotations: Some(json!({ "readOnlyHint": endpoint.is_read() })),
    }
}

fn property_names(schema: &Value) -> Vec<String> {
    schema
        .get("properties")
        .and_then(|v| v.as_object())
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}

fn format_type_kind(kind: &TypeKind) -> String {
    match kind {
        TypeKind::Single(primitive) => primitive.to_string(),
        TypeKind::Multiple(types) => {
            let list: Vec<String> = (*types).into_iter().map(|t| t.to_string()).collect();
            if list.is_empty() {
                "unknown".to_string()
            } else {
                list.join(" | ")
            }
        }
    }
}

/// Checks `args` against the tool's generated schema. Unknown tools pass
/// through; dispatch reports those.
pub fn validate_tool_args(tool_name: &str, args: &Value) -> Result<(), ToolError> {
    let (Some(tool), Some(schema)) = (tool_by_name(tool_name), TOOL_VALIDATORS.get(tool_name)) else {
        return Ok(());
    };
    let Err(errors) = schema.validate(args) else {
        return Ok(());
    };

    let known = property_names(&tool.input_schema);
    let mut unknown: Vec<String> = Vec::new();
    let mut rendered: Vec<String> = Vec::new();
    for err in errors.take(10) {
        let path = err.instance_path.to_string();
        let path = if path.is_empty() { "(root)".to_string() } else { path };
        match &err.kind {
            ValidationErrorKind::AdditionalProperties { unexpected } => {
                unknown.extend(unexpected.iter().cloned());
            }
            ValidationErrorKind::Required { property } => {
                let prop = property
                    .as_str()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| property.to_string());
                rendered.push(format!("{}: missing required field '{}'", path, prop));
            }
            ValidationErrorKind::Type { kind } => {
                rendered.push(format!("{}: expected {}", path, format_type_kind(kind)));
            }
            _ => rendered.push(format!("{}: {}", path, err)),
        }
    }

    if rendered.is_empty() && !unknown.is_empty() {
        return Err(unknown_field_error(tool_name, &unknown, &known, SUGGESTION_LIMIT));
    }

    let mut lines = vec![format!("Invalid arguments for {}", tool_name)];
    lines.extend(unknown.iter().map(|field| format!("- (root): unknown field '{}'", field)));
    lines.extend(rendered.iter().map(|line| format!("- {}", line)));
    let mut err = ToolError::invalid_params(lines.join("\n"));
    let suggestions: Vec<String> = unknown
        .iter()
        .flat_map(|field| suggest(field, &known, SUGGESTION_LIMIT))
        .collect();
    if !suggestions.is_empty() {
        err = err.with_hint(format!("Did you mean: {}?", suggestions.join(", ")));
    }
    Err(err)
}

/// Rewrites `"type": [..]` unions into `anyOf` for hosts that reject type
/// arrays in tool schemas.
pub fn normalize_schema_for_listing(schema: &Value) -> Value {
    let Value::Object(map) = schema else {
        return schema.clone();
    };
    let mut out = map.clone();
    if let Some(props) = map.get("properties").and_then(|v| v.as_object()) {
        let normalized: Map<String, Value> = props
            .iter()
            .map(|(key, value)| (key.clone(), normalize_schema_for_listing(value)))
            .collect();
        out.insert("properties".to_string(), Value::Object(normalized));
    }
    if let Some(types) = map.get("type").and_then(|v| v.as_array()) {
        out.remove("type");
        let any_of: Vec<Value> = types
            .iter()
            .filter_map(|t| t.as_str())
            .map(|t| {
                if t == "array" {
                    json!({"type": "array", "items": {}})
                } else {
                    json!({"type": t})
                }
            })
            .collect();
        out.insert("anyOf".to_string(), Value::Array(any_of));
    }
    Value::Object(out)
}

pub fn list_tools() -> Vec<ToolDef> {
    tool_catalog()
        .iter()
        .map(|tool| ToolDef {
            input_schema: normalize_schema_for_listing(&tool.input_schema),
            ..tool.clone()
        })
        .collect()
}
