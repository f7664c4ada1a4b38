//! Session correlation from request metadata.
//!
//! Conversation clients tag requests with `metadata.user_id` values such as
//! `user_<hash>_account_<uuid>_session_<uuid>`. Everything after the session
//! marker is the session id that keys the persisted transcript.

use serde_json::Value;

/// Literal separator that precedes the session id in `metadata.user_id`.
pub const SESSION_MARKER: &str = "_session_";

/// Extract the session id from a request body.
///
/// Returns `None` when the metadata field is absent, not a string, lacks the
/// marker, or has nothing after it. Only the remainder of the first line is
/// taken.
pub fn extract_session_id(body: &Value) -> Option<String> {
    let user_id = body.get("metadata")?.get("user_id")?.as_str()?;
    let start = user_id.find(SESSION_MARKER)? + SESSION_MARKER.len();
    let rest = &user_id[start..];
    let id = rest.split(['\n', '\r']).next().unwrap_or_default();
    (!id.is_empty()).then(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_suffix_after_marker() {
        let body = json!({
            "metadata": { "user_id": "user_abc_account_123_session_9f1c-77aa" }
        });
        assert_eq!(extract_session_id(&body).as_deref(), Some("9f1c-77aa"));
    }

    #[test]
    fn first_marker_wins() {
        let body = json!({ "metadata": { "user_id": "x_session_a_session_b" } });
        assert_eq!(extract_session_id(&body).as_deref(), Some("a_session_b"));
    }

    #[test]
    fn missing_metadata_yields_none() {
        assert_eq!(extract_session_id(&json!({ "messages": [] })), None);
        assert_eq!(extract_session_id(&json!({ "metadata": {} })), None);
        assert_eq!(extract_session_id(&json!({ "metadata": { "user_id": 42 } })), None);
        assert_eq!(extract_session_id(&json!("not an object")), None);
    }

    #[test]
    fn marker_absent_or_empty_suffix_yields_none() {
        assert_eq!(
            extract_session_id(&json!({ "metadata": { "user_id": "user_abc" } })),
            None
        );
        assert_eq!(
            extract_session_id(&json!({ "metadata": { "user_id": "user_abc_session_" } })),
            None
        );
    }

    #[test]
    fn stops_at_line_break() {
        let body = json!({ "metadata": { "user_id": "u_session_abc\nextra" } });
        assert_eq!(extract_session_id(&body).as_deref(), Some("abc"));
    }
}
