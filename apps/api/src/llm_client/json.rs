//! Recovers a JSON object from free-form model output.

use serde_json::{Map, Value};

use crate::errors::AppError;

const SNIPPET_CHARS: usize = 200;

/// Tries, in order: the whole text, the text with code fences removed, the first
/// balanced top-level `{...}` span, and finally the span from the first `{` to
/// the last `}`. Only a JSON object is accepted.
pub fn extract_json_object(text: &str) -> Result<Map<String, Value>, AppError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::ModelOutputNotJson("empty response".to_string()));
    }

    if let Some(object) = parse_object(trimmed) {
        return Ok(object);
    }

    let unfenced = strip_fences(trimmed);
    if let Some(object) = parse_object(&unfenced) {
        return Ok(object);
    }

    if let Some(object) = first_balanced_object(&unfenced).and_then(parse_object) {
        return Ok(object);
    }

    let greedy = match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => parse_object(&unfenced[start..=end]),
        _ => None,
    };
    greedy.ok_or_else(|| AppError::ModelOutputNotJson(trimmed.chars().take(SNIPPET_CHARS).collect()))
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Removes every ``` fence marker along with an optional `json`/`JSON` tag.
fn strip_fences(text: &str) -> String {
    text.replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// The first `{...}` span whose braces balance, ignoring braces inside strings.
fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
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
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}
