//! Pulls the insight object out of free-form model output.

use crate::error::GenerationError;
use serde_json::Value;

/// Insights and alerts decoded from a model response.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInsights {
    pub insights: Vec<String>,
    pub alerts: Vec<String>,
}

/// Returns the first balanced top-level `{...}` span in `text`.
///
/// Braces inside JSON string literals (including escaped quotes) are ignored,
/// so nested objects and strings such as `"{not a brace}"` do not end the span
/// early. Returns `None` if no object is ever closed.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if depth > 0 && in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return start.map(|s| &text[s..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Keeps string items as-is and renders anything else as compact JSON.
pub(crate) fn string_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect()
}

/// Extracts and validates the `{insights: [...], alerts: [...]}` object.
///
/// Arrays of any length are accepted. Non-string items are kept as their
/// compact JSON text.
pub fn parse_insights(text: &str) -> Result<ParsedInsights, GenerationError> {
    let json = extract_json_object(text).ok_or(GenerationError::NoJsonObject)?;
    let value: Value =
        serde_json::from_str(json).map_err(|e| GenerationError::MalformedJson(e.to_string()))?;

    let insights = value
        .get("insights")
        .and_then(Value::as_array)
        .ok_or(GenerationError::MissingInsights)?;
    let alerts = value
        .get("alerts")
        .and_then(Value::as_array)
        .ok_or(GenerationError::MissingAlerts)?;

    Ok(ParsedInsights {
        insights: string_items(insights),
        alerts: string_items(alerts),
    })
}
