//! Integration tests for the filesystem transcript store.

use serde_json::json;

use llmux_core::domain::TranscriptRecord;
use llmux_core::ports::{TranscriptStore, TranscriptStoreError};
use llmux_store::JsonFileTranscriptStore;

#[tokio::test]
async fn second_exchange_overwrites_first() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileTranscriptStore::new(dir.path().join("logs"));

    let first = TranscriptRecord::with_reply(
        "sess-1",
        vec![json!({ "role": "user", "content": "hi" })],
        json!([{ "type": "text", "text": "hello" }]),
    );
    let second = TranscriptRecord::with_reply(
        "sess-1",
        vec![
            json!({ "role": "user", "content": "hi" }),
            json!({ "role": "assistant", "content": [{ "type": "text", "text": "hello" }] }),
            json!({ "role": "user", "content": "again" }),
        ],
        json!([{ "type": "text", "text": "hello again" }]),
    );

    store.put(&first).await.unwrap();
    store.put(&second).await.unwrap();

    let stored = store.get("sess-1").await.unwrap().unwrap();
    assert_eq!(stored, second);
    assert_eq!(stored.messages.len(), 4);

    // Only the record itself remains; temporary files are renamed away.
    let entries: Vec<_> = std::fs::read_dir(store.dir())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(entries, vec!["sess-1.json".to_string()]);
}

#[tokio::test]
async fn record_file_is_pretty_json_with_session_id() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileTranscriptStore::new(dir.path());

    let record = TranscriptRecord::with_reply("abc", vec![], json!("reply"));
    store.put(&record).await.unwrap();

    let raw = std::fs::read_to_string(dir.path().join("abc.json")).unwrap();
    assert!(raw.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["sessionId"], "abc");
    assert_eq!(value["messages"][0], json!({ "role": "assistant", "content": "reply" }));
}

#[tokio::test]
async fn missing_record_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileTranscriptStore::new(dir.path());
    assert_eq!(store.get("unknown").await.unwrap(), None);
}

#[tokio::test]
async fn traversal_ids_are_refused_without_touching_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileTranscriptStore::new(dir.path().join("logs"));

    let record = TranscriptRecord::with_reply("../escape", vec![], json!("x"));
    let err = store.put(&record).await.unwrap_err();

    assert!(matches!(err, TranscriptStoreError::InvalidSessionId(_)));
    assert!(!dir.path().join("logs").exists());
    assert!(!dir.path().join("escape.json").exists());
}
