//! In-memory implementation of the `TranscriptStore` trait.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use llmux_core::domain::TranscriptRecord;
use llmux_core::ports::{TranscriptStore, TranscriptStoreError};

/// Map-backed transcript store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryTranscriptStore {
    records: RwLock<HashMap<String, TranscriptRecord>>,
}

impl InMemoryTranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions with a stored record.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl TranscriptStore for InMemoryTranscriptStore {
    async fn put(&self, record: &TranscriptRecord) -> Result<(), TranscriptStoreError> {
        if record.session_id.is_empty() {
            return Err(TranscriptStoreError::InvalidSessionId(String::new()));
        }
        self.records
            .write()
            .await
            .insert(record.session_id.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<TranscriptRecord>, TranscriptStoreError> {
        Ok(self.records.read().await.get(session_id).cloned())
    }
}
