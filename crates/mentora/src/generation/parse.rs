use serde::de::DeserializeOwned;

use super::{GenerationError, Result};

/// Remove a surrounding Markdown code fence such as ```` ```json ... ``` ````
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string (`json`, `JSON`, ...) on the opening line
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Strip fences and deserialize a structured payload
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    let body = strip_code_fences(text);
    if body.is_empty() {
        return Err(GenerationError::MalformedResponse(
            "empty response body".to_string(),
        ));
    }
    Ok(serde_json::from_str(body)?)
}
