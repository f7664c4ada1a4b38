//! Directory-of-JSON-files implementation of the `TranscriptStore` trait.
//!
//! Layout: `<dir>/<session_id>.json`, one pretty-printed record per session.
//! Writes go to a temporary sibling first and are renamed into place, so a
//! reader never observes a half-written record. Concurrent writers for the
//! same session race; the last rename wins.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::debug;

use llmux_core::domain::TranscriptRecord;
use llmux_core::ports::{TranscriptStore, TranscriptStoreError};

/// Longest session id accepted as a file stem.
const MAX_SESSION_ID_LEN: usize = 200;

/// Distinguishes temporary files of concurrent writers.
static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Filesystem transcript store.
#[derive(Debug, Clone)]
pub struct JsonFileTranscriptStore {
    dir: PathBuf,
}

impl JsonFileTranscriptStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory records are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record file for a session.
    pub fn record_path(&self, session_id: &str) -> Result<PathBuf, TranscriptStoreError> {
        validate_session_id(session_id)?;
        Ok(self.dir.join(format!("{session_id}.json")))
    }
}

/// Session ids come from client-supplied metadata and become file names, so
/// anything that could escape the directory is refused.
fn validate_session_id(session_id: &str) -> Result<(), TranscriptStoreError> {
    let invalid = session_id.is_empty()
        || session_id.len() > MAX_SESSION_ID_LEN
        || session_id.starts_with('.')
        || session_id.contains("..")
        || session_id
            .chars()
            .any(|c| matches!(c, '/' | '\\' | ':' | '\0') || c.is_control());
    if invalid {
        return Err(TranscriptStoreError::InvalidSessionId(session_id.to_string()));
    }
    Ok(())
}

#[async_trait]
impl TranscriptStore for JsonFileTranscriptStore {
    async fn put(&self, record: &TranscriptRecord) -> Result<(), TranscriptStoreError> {
        let path = self.record_path(&record.session_id)?;
        let body = serde_json::to_vec_pretty(record)
            .map_err(|e| TranscriptStoreError::Serialization(e.to_string()))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| TranscriptStoreError::Storage(e.to_string()))?;

        let tmp = self.dir.join(format!(
            ".{}.{}.{}.tmp",
            record.session_id,
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        tokio::fs::write(&tmp, &body)
            .await
            .map_err(|e| TranscriptStoreError::Storage(e.to_string()))?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(TranscriptStoreError::Storage(e.to_string()));
        }

        debug!(
            session_id = %record.session_id,
            messages = record.messages.len(),
            path = %path.display(),
            "Wrote session transcript"
        );
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<TranscriptRecord>, TranscriptStoreError> {
        let path = self.record_path(session_id)?;
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(TranscriptStoreError::Storage(e.to_string())),
        };
        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|e| TranscriptStoreError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_ids() {
        for id in ["9f1c-77aa", "abc_def", "A1.b2", "550e8400-e29b-41d4-a716-446655440000"] {
            assert!(validate_session_id(id).is_ok(), "{id}");
        }
    }

    #[test]
    fn rejects_ids_that_escape_the_directory() {
        for id in ["", "../etc/passwd", "a/b", "a\\b", ".hidden", "a..b", "c:evil", "x\ny"] {
            assert!(
                matches!(
                    validate_session_id(id),
                    Err(TranscriptStoreError::InvalidSessionId(_))
                ),
                "{id:?}"
            );
        }
        assert!(validate_session_id(&"x".repeat(MAX_SESSION_ID_LEN + 1)).is_err());
    }

    #[test]
    fn record_path_is_inside_dir() {
        let store = JsonFileTranscriptStore::new("/var/llmux/logs");
        assert_eq!(
            store.record_path("abc").unwrap(),
            PathBuf::from("/var/llmux/logs/abc.json")
        );
    }
}
