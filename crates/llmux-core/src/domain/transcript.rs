//! Persisted session transcripts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single `{role, content}` entry in a transcript.
///
/// Content is opaque JSON: a string, an array of content blocks, or whatever
/// the client sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: Value,
}

impl ChatTurn {
    pub fn assistant(content: Value) -> Self {
        Self {
            role: "assistant".to_string(),
            content,
        }
    }
}

impl From<ChatTurn> for Value {
    fn from(turn: ChatTurn) -> Self {
        let mut map = serde_json::Map::with_capacity(2);
        map.insert("role".to_string(), Self::String(turn.role));
        map.insert("content".to_string(), turn.content);
        Self::Object(map)
    }
}

/// The stored record for one session: the full message history of the latest
/// completed exchange plus its reconstructed assistant turn.
///
/// Each write replaces the previous record for the same session; clients
/// resend the growing history on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptRecord {
    pub session_id: String,
    /// Request messages as received, followed by the assistant reply.
    pub messages: Vec<Value>,
}

impl TranscriptRecord {
    /// Build a record from the request history and the reconstructed reply.
    pub fn with_reply(session_id: impl Into<String>, history: Vec<Value>, reply: Value) -> Self {
        let mut messages = history;
        messages.push(ChatTurn::assistant(reply).into());
        Self {
            session_id: session_id.into(),
            messages,
        }
    }

    /// The last message, which for records produced by the gateway is the
    /// assistant turn.
    pub fn reply(&self) -> Option<&Value> {
        self.messages.last()
    }
}
