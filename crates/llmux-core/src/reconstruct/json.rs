//! Content extraction from buffered (non-streaming) JSON responses.

use serde_json::Value;

use super::is_empty_content;

/// Pull the assistant content out of a complete JSON response body.
///
/// Two shapes are understood:
/// - a top-level `content` field (messages API),
/// - `choices[0].message.content` (chat completions API).
pub fn extract_json_content(raw: &str) -> Option<Value> {
    let data: Value = serde_json::from_str(raw).ok()?;

    if let Some(content) = data.get("content").filter(|c| !is_empty_content(c)) {
        return Some(content.clone());
    }

    data.pointer("/choices/0/message/content").cloned()
}
