use crate::error::ToolError;
use serde_json::{Map, Value};

/// A validated invocation descriptor decoded from one completion.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub name: String,
    pub args: Map<String, Value>,
}

/// Parse one completion into a [`ToolInvocation`].
///
/// Cleanup grammar: trim outer whitespace, then strip one outer fenced code
/// block (triple-backtick delimiters, optional language tag after the
/// opening fence). The payload must be a single JSON object with a string
/// `tool` (or `name`) field; `args`, if present, must be an object and
/// defaults to empty when absent. Anything else is a
/// [`ToolError::MalformedToolCall`] — no partial recovery.
pub fn parse_tool_call(text: &str) -> Result<ToolInvocation, ToolError> {
    let payload = strip_code_fences(text);

    let value: Value = serde_json::from_str(payload)
        .map_err(|e| ToolError::MalformedToolCall(format!("invalid JSON: {e}")))?;

    let Value::Object(object) = value else {
        return Err(ToolError::MalformedToolCall(
            "top-level value must be a JSON object".to_string(),
        ));
    };

    let name = match object.get("tool").or_else(|| object.get("name")) {
        Some(Value::String(name)) => name.clone(),
        Some(_) => {
            return Err(ToolError::MalformedToolCall(
                "'tool' field must be a string".to_string(),
            ))
        }
        None => {
            return Err(ToolError::MalformedToolCall(
                "missing 'tool' field".to_string(),
            ))
        }
    };

    let args = match object.get("args") {
        None => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => {
            return Err(ToolError::MalformedToolCall(
                "'args' field must be an object".to_string(),
            ))
        }
    };

    Ok(ToolInvocation { name, args })
}

/// Strip one outer ``` fence, tolerating a language tag line before the
/// payload. Text without a matching fence pair is returned trimmed.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let Some(body) = trimmed
        .strip_prefix("```")
        .and_then(|t| t.strip_suffix("```"))
    else {
        return trimmed;
    };

    // Opening fences like ```json carry the tag on the first line.
    let body = match body.split_once('\n') {
        Some((first, rest)) if !first.trim_start().starts_with('{') => rest,
        _ => body,
    };
    body.trim()
}
