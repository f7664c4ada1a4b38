//! Assistant reply reconstruction from captured upstream bodies.
//!
//! Streamed responses are rebuilt block by block from the event-stream wire
//! format; buffered responses are read from their JSON body. Nothing here
//! ever fails loudly: malformed input simply yields no reply.

mod json;
mod sse;

pub use json::extract_json_content;
pub use sse::SseReconstructor;

use serde_json::Value;

/// Content type marker for server-sent event streams.
pub const EVENT_STREAM_CONTENT_TYPE: &str = "text/event-stream";

/// Whether a response `content-type` denotes an event stream.
pub fn is_event_stream(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.contains(EVENT_STREAM_CONTENT_TYPE))
}

/// Rebuild the assistant reply from a complete response body.
///
/// Returns `None` when the body cannot be parsed or carries no content.
pub fn reconstruct_reply(raw: &str, is_event_stream: bool) -> Option<Value> {
    let content = if is_event_stream {
        SseReconstructor::reconstruct(raw).map(Value::Array)
    } else {
        extract_json_content(raw)
    };
    content.filter(|c| !is_empty_content(c))
}

/// `null`, `""` and `[]` count as no content.
pub fn is_empty_content(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
