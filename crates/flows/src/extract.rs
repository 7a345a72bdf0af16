//! Pull a JSON object out of raw model text.
//!
//! Providers in JSON mode usually return a bare object, but models still
//! wrap answers in Markdown fences or add a sentence of prose. Nothing here
//! repairs content: if no well-formed JSON is found the caller gets an error.

use serde_json::Value;

/// Extract the JSON value a model answered with.
///
/// Tries, in order: the whole text, the first fenced code block, and the
/// span from the first `{` to the last `}`. The first candidate that parses
/// as an object wins; otherwise a directly parseable non-object value is
/// returned so schema validation can report its type.
pub fn extract_json(raw: &str) -> Result<Value, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("model returned empty text".to_string());
    }

    let direct = serde_json::from_str::<Value>(trimmed).ok();
    if let Some(value @ Value::Object(_)) = direct {
        return Ok(value);
    }

    let candidates = [fenced_block(trimmed), brace_span(trimmed)];
    for candidate in candidates.into_iter().flatten() {
        if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(candidate) {
            return Ok(value);
        }
    }

    direct.ok_or_else(|| {
        let preview: String = trimmed.chars().take(80).collect();
        format!("no JSON object found in model text: {:?}", preview)
    })
}

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    // Skip an info string such as `json`
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}
