//! Content block reconstruction from an event stream.
//!
//! The messages API streams a reply as a sequence of events:
//!
//! ```text
//! data: {"type":"content_block_start","index":0,"content_block":{"type":"tool_use","id":"t1","name":"calc","input":{}}}
//! data: {"type":"content_block_delta","index":0,"delta":{"type":"input_json_delta","partial_json":"{\"x\":"}}
//! data: {"type":"content_block_delta","index":0,"delta":{"type":"input_json_delta","partial_json":"1}"}}
//! ```
//!
//! Each block is held in a [`BlockAccumulator`] keyed by its index. String
//! fields grow by appending delta fragments; `partial_json` grows the same way
//! and is parsed into `input` once the stream is over.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::trace;

/// Prefix of event payload lines.
const DATA_PREFIX: &str = "data: ";

/// Delta field that carries fragments of a JSON document.
const PARTIAL_JSON_FIELD: &str = "partial_json";

/// Field that receives the parsed `partial_json` document.
const PARSED_JSON_FIELD: &str = "input";

/// Delta discriminator, never copied into the block.
const DELTA_TYPE_FIELD: &str = "type";

/// Upper bound on block indices; anything above is treated as malformed.
const MAX_BLOCK_INDEX: usize = 4096;

/// The two event kinds that shape content blocks. Everything else
/// (`message_start`, `ping`, `message_delta`, ...) is ignored.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamEvent {
    ContentBlockStart {
        index: usize,
        content_block: Map<String, Value>,
    },
    ContentBlockDelta {
        index: usize,
        delta: Map<String, Value>,
    },
    #[serde(other)]
    Other,
}

/// Accumulating state for one content block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct BlockAccumulator {
    /// Fields from the start event, with string fields extended by deltas.
    fields: Map<String, Value>,
    /// Concatenated `partial_json` fragments, parsed at finish.
    partial_json: Option<String>,
}

impl BlockAccumulator {
    /// Seed a block from its start event.
    ///
    /// Object and array fields are placeholders in start events (the real
    /// value arrives through deltas) and are reset to empty strings.
    fn start(content_block: Map<String, Value>) -> Self {
        let mut block = Self::default();
        for (key, mut value) in content_block {
            if value.is_object() || value.is_array() {
                value = Value::String(String::new());
            }
            if key == PARTIAL_JSON_FIELD {
                block.partial_json = Some(accumulated_text(&value));
            } else {
                block.fields.insert(key, value);
            }
        }
        block
    }

    /// Append every delta field (except its type tag) to the block.
    fn apply_delta(&mut self, delta: Map<String, Value>) {
        for (key, value) in delta {
            if key == DELTA_TYPE_FIELD {
                continue;
            }
            let fragment = fragment_text(&value);
            if key == PARTIAL_JSON_FIELD {
                self.partial_json
                    .get_or_insert_with(String::new)
                    .push_str(&fragment);
                continue;
            }
            let slot = self.fields.entry(key).or_insert(Value::Null);
            let mut text = accumulated_text(slot);
            text.push_str(&fragment);
            *slot = Value::String(text);
        }
    }

    /// Produce the finished block, parsing any accumulated `partial_json`.
    fn finish(self) -> Value {
        let mut fields = self.fields;
        if let Some(raw) = self.partial_json {
            let parsed = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
            fields.insert(PARSED_JSON_FIELD.to_string(), parsed);
        }
        Value::Object(fields)
    }
}

/// Current value of an accumulating field as text.
///
/// Missing and falsy seeds (`null`, `false`, `0`, `""`) start empty.
fn accumulated_text(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Number(n) if n.as_f64() == Some(0.0) => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Text form of a delta fragment.
fn fragment_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Incremental rebuilder of the content block array of a streamed reply.
///
/// Feed it lines (or whole chunks of text) in arrival order, then call
/// [`finish`](Self::finish). Malformed payloads and deltas for blocks that
/// were never started are skipped.
#[derive(Debug, Default, Clone)]
pub struct SseReconstructor {
    blocks: Vec<Option<BlockAccumulator>>,
}

impl SseReconstructor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the block array from a complete event-stream body.
    pub fn reconstruct(raw: &str) -> Option<Vec<Value>> {
        let mut reconstructor = Self::new();
        reconstructor.push_text(raw);
        reconstructor.finish()
    }

    /// Feed a run of complete lines.
    pub fn push_text(&mut self, text: &str) {
        for line in text.split('\n') {
            self.push_line(line);
        }
    }

    /// Feed a single line. Lines without the `data: ` prefix are ignored.
    pub fn push_line(&mut self, line: &str) {
        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            return;
        };
        match serde_json::from_str::<StreamEvent>(payload) {
            Ok(event) => self.apply(event),
            Err(e) => trace!(error = %e, "Skipping unparseable event payload"),
        }
    }

    fn apply(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::ContentBlockStart {
                index,
                content_block,
            } => {
                if index > MAX_BLOCK_INDEX {
                    trace!(index, "Ignoring content block with out-of-range index");
                    return;
                }
                if self.blocks.len() <= index {
                    self.blocks.resize(index + 1, None);
                }
                self.blocks[index] = Some(BlockAccumulator::start(content_block));
            }
            StreamEvent::ContentBlockDelta { index, delta } => {
                match self.blocks.get_mut(index).and_then(Option::as_mut) {
                    Some(block) => block.apply_delta(delta),
                    None => trace!(index, "Ignoring delta for unknown content block"),
                }
            }
            StreamEvent::Other => {}
        }
    }

    /// Finish the stream and return the ordered block array.
    ///
    /// Indices that never saw a start event are `null`. Returns `None` when no
    /// block was ever started.
    pub fn finish(self) -> Option<Vec<Value>> {
        if self.blocks.is_empty() {
            return None;
        }
        Some(
            self.blocks
                .into_iter()
                .map(|block| block.map_or(Value::Null, BlockAccumulator::finish))
                .collect(),
        )
    }
}
