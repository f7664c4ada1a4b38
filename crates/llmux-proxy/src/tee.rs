//! Response tee for conversation endpoints.
//!
//! The caller branch yields upstream chunks as they arrive. A copy of each
//! chunk goes over an unbounded channel to a capture task, which buffers the
//! whole exchange, reconstructs the assistant reply once the stream has ended
//! and writes the transcript. The caller never waits on the capture task.
//!
//! The capture task only persists when it saw the end-of-stream signal. That
//! signal is sent when upstream ends, or as soon as the declared
//! `content-length` has been delivered, since the server stops polling a
//! body once that many bytes are written. An upstream error or a caller
//! disconnect drops the sender first, so partial exchanges are never written.

use std::io;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use llmux_core::reconstruct::is_event_stream;
use llmux_core::{TranscriptRecord, TranscriptStore, extract_session_id, reconstruct_reply};

/// Caller-facing body stream.
pub type TeeStream = BoxStream<'static, Result<Bytes, io::Error>>;

/// Message from the caller branch to the capture task.
#[derive(Debug)]
enum Tapped {
    Chunk(Bytes),
    Finished,
}

/// What the capture task needs from the request to build a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptCapture {
    pub session_id: String,
    pub history: Vec<Value>,
    pub event_stream: bool,
}

impl TranscriptCapture {
    /// Returns `None` when the request has no session id or no `messages`
    /// array, in which case nothing is captured.
    pub fn from_request(request_body: &Value, content_type: Option<&str>) -> Option<Self> {
        let session_id = extract_session_id(request_body)?;
        let history = request_body.get("messages")?.as_array()?.clone();
        Some(Self {
            session_id,
            history,
            event_stream: is_event_stream(content_type),
        })
    }

    async fn run(self, mut rx: mpsc::UnboundedReceiver<Tapped>, store: Arc<dyn TranscriptStore>) {
        let mut buffer = Vec::new();
        let mut finished = false;
        while let Some(message) = rx.recv().await {
            match message {
                Tapped::Chunk(chunk) => buffer.extend_from_slice(&chunk),
                Tapped::Finished => {
                    finished = true;
                    break;
                }
            }
        }

        if !finished {
            debug!(
                session_id = %self.session_id,
                bytes = buffer.len(),
                "Response did not complete, transcript skipped"
            );
            return;
        }

        self.persist(&buffer, store.as_ref()).await;
    }

    async fn persist(self, raw: &[u8], store: &dyn TranscriptStore) {
        let raw = String::from_utf8_lossy(raw);
        let Some(reply) = reconstruct_reply(&raw, self.event_stream) else {
            debug!(session_id = %self.session_id, "No assistant content, transcript skipped");
            return;
        };

        let record = TranscriptRecord::with_reply(self.session_id, self.history, reply);
        match store.put(&record).await {
            Ok(()) => info!(
                session_id = %record.session_id,
                messages = record.messages.len(),
                "Session transcript saved"
            ),
            Err(e) => warn!(
                session_id = %record.session_id,
                error = %e,
                "Failed to save session transcript"
            ),
        }
    }
}

struct TeeState {
    upstream: Option<TeeStream>,
    tap: Option<mpsc::UnboundedSender<Tapped>>,
    /// Declared body length, if upstream sent one.
    expected: Option<u64>,
    delivered: u64,
}

impl TeeState {
    fn finish_capture(&mut self) {
        if let Some(tap) = self.tap.take() {
            let _ = tap.send(Tapped::Finished);
        }
    }
}

/// Wire an upstream body through the capture tee.
///
/// `content_length` is the upstream's declared body length; once that many
/// bytes have passed through, the exchange counts as complete.
///
/// Without a capturable request the upstream stream is returned with only its
/// error type mapped.
pub fn tee<S, E>(
    upstream: S,
    request_body: Option<&Value>,
    content_type: Option<&str>,
    content_length: Option<u64>,
    store: Arc<dyn TranscriptStore>,
) -> TeeStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
{
    let upstream = upstream.map_err(io::Error::other).boxed();
    let Some(capture) =
        request_body.and_then(|body| TranscriptCapture::from_request(body, content_type))
    else {
        return upstream;
    };

    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(capture.run(rx, store));

    let state = TeeState {
        upstream: Some(upstream),
        tap: Some(tx),
        expected: content_length,
        delivered: 0,
    };
    stream::unfold(state, |mut state| async move {
        let upstream = state.upstream.as_mut()?;
        match upstream.next().await {
            Some(Ok(chunk)) => {
                if let Some(tap) = &state.tap {
                    let _ = tap.send(Tapped::Chunk(chunk.clone()));
                }
                state.delivered += chunk.len() as u64;
                if state.expected.is_some_and(|n| state.delivered >= n) {
                    state.finish_capture();
                }
                Some((Ok(chunk), state))
            }
            Some(Err(e)) => {
                state.upstream = None;
                state.tap = None;
                Some((Err(e), state))
            }
            None => {
                state.finish_capture();
                None
            }
        }
    })
    .boxed()
}
