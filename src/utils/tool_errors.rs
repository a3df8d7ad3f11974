use crate::errors::ToolError;
use crate::utils::suggest::suggest;

fn did_you_mean(input: &str, known: &[String], limit: usize) -> (Vec<String>, Option<String>) {
    let suggestions = suggest(input, known, limit);
    let hint = if suggestions.is_empty() {
        None
    } else {
        Some(format!("Did you mean: {}?", suggestions.join(", ")))
    };
    (suggestions, hint)
}

pub fn unknown_tool_error(tool: &str, known_tools: &[String], limit: usize) -> ToolError {
    let (suggestions, hint) = did_you_mean(tool, known_tools, limit);
    let hint = hint.unwrap_or_else(|| "Call tools/list to see the available tools.".to_string());
    ToolError::invalid_params(format!("Unknown tool: {}", tool))
        .with_hint(hint)
        .with_details(serde_json::json!({ "did_you_mean": suggestions }))
}

pub fn unknown_field_error(tool: &str, fields: &[String], known_fields: &[String], limit: usize) -> ToolError {
    let mut suggestions: Vec<String> = Vec::new();
    for field in fields {
        for candidate in did_you_mean(field, known_fields, limit).0 {
            if !suggestions.contains(&candidate) {
                suggestions.push(candidate);
            }
        }
    }
    let mut err = ToolError::invalid_params(format!(
        "Unknown argument(s) for {}: {}",
        tool,
        fields.join(", ")
    ));
    err = if suggestions.is_empty() {
        err.with_hint(format!("Allowed arguments: {}.", known_fields.join(", ")))
    } else {
        err.with_hint(format!("Did you mean: {}?", suggestions.join(", ")))
    };
    err.with_details(serde_json::json!({
        "unknown": fields,
        "did_you_mean": suggestions,
    }))
}
