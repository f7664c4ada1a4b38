//! Transcript persistence port.
//!
//! The gateway only ever needs to "put the record for a session id". Keeping
//! that behind a trait leaves reconstruction free of any filesystem details.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::TranscriptRecord;

/// Errors that can occur while persisting transcripts.
#[derive(Debug, Error)]
pub enum TranscriptStoreError {
    /// The session id cannot be used as a storage key.
    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Port for storing session transcripts.
///
/// Writes are last-writer-wins: `put` fully replaces any record previously
/// stored under the same session id. Concurrent writes for one session are
/// not serialized.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Store (or overwrite) the record for `record.session_id`.
    async fn put(&self, record: &TranscriptRecord) -> Result<(), TranscriptStoreError>;

    /// Fetch the current record for a session.
    async fn get(&self, session_id: &str) -> Result<Option<TranscriptRecord>, TranscriptStoreError>;
}
