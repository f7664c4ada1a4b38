//! Rebuilding assistant replies from realistic captured bodies.

use serde_json::{Value, json};

use llmux_core::{TranscriptRecord, extract_session_id, reconstruct_reply};

fn event(kind: &str, payload: &Value) -> String {
    format!("event: {kind}\ndata: {payload}\n\n")
}

fn anthropic_stream() -> String {
    [
        event("message_start", &json!({ "type": "message_start", "message": { "id": "msg_01", "content": [] } })),
        event("content_block_start", &json!({ "type": "content_block_start", "index": 0, "content_block": { "type": "thinking", "thinking": "", "signature": "" } })),
        event("content_block_delta", &json!({ "type": "content_block_delta", "index": 0, "delta": { "type": "thinking_delta", "thinking": "The user wants " } })),
        event("content_block_delta", &json!({ "type": "content_block_delta", "index": 0, "delta": { "type": "thinking_delta", "thinking": "the weather." } })),
        event("content_block_delta", &json!({ "type": "content_block_delta", "index": 0, "delta": { "type": "signature_delta", "signature": "sig==" } })),
        event("content_block_stop", &json!({ "type": "content_block_stop", "index": 0 })),
        event("content_block_start", &json!({ "type": "content_block_start", "index": 1, "content_block": { "type": "text", "text": "" } })),
        event("content_block_delta", &json!({ "type": "content_block_delta", "index": 1, "delta": { "type": "text_delta", "text": "Checking " } })),
        event("content_block_delta", &json!({ "type": "content_block_delta", "index": 1, "delta": { "type": "text_delta", "text": "now." } })),
        event("content_block_start", &json!({ "type": "content_block_start", "index": 2, "content_block": { "type": "tool_use", "id": "toolu_1", "name": "get_weather", "input": {} } })),
        event("content_block_delta", &json!({ "type": "content_block_delta", "index": 2, "delta": { "type": "input_json_delta", "partial_json": "" } })),
        event("content_block_delta", &json!({ "type": "content_block_delta", "index": 2, "delta": { "type": "input_json_delta", "partial_json": "{\"city\": \"Par" } })),
        event("content_block_delta", &json!({ "type": "content_block_delta", "index": 2, "delta": { "type": "input_json_delta", "partial_json": "is\"}" } })),
        event("message_delta", &json!({ "type": "message_delta", "delta": { "stop_reason": "tool_use" } })),
        "event: ping\ndata: not json at all\n\n".to_string(),
        event("message_stop", &json!({ "type": "message_stop" })),
    ]
    .concat()
}

#[test]
fn streamed_reply_becomes_transcript_turn() {
    let request = json!({
        "model": "claude-sonnet",
        "metadata": { "user_id": "user_7f_account_aa_session_0b9e-4c" },
        "messages": [{ "role": "user", "content": "Weather in Paris?" }]
    });

    let reply = reconstruct_reply(&anthropic_stream(), true).expect("reply");
    assert_eq!(
        reply,
        json!([
            { "type": "thinking", "thinking": "The user wants the weather.", "signature": "sig==" },
            { "type": "text", "text": "Checking now." },
            { "type": "tool_use", "id": "toolu_1", "name": "get_weather", "input": { "city": "Paris" } }
        ])
    );

    let session = extract_session_id(&request).expect("session id");
    let history = request["messages"].as_array().unwrap().clone();
    let record = TranscriptRecord::with_reply(session, history, reply.clone());

    assert_eq!(
        serde_json::to_value(&record).unwrap(),
        json!({
            "sessionId": "0b9e-4c",
            "messages": [
                { "role": "user", "content": "Weather in Paris?" },
                { "role": "assistant", "content": reply }
            ]
        })
    );
}

#[test]
fn reconstruction_is_deterministic() {
    let raw = anthropic_stream();
    assert_eq!(reconstruct_reply(&raw, true), reconstruct_reply(&raw, true));
}

#[test]
fn buffered_bodies_of_both_shapes() {
    let anthropic = r#"{"id":"msg_1","type":"message","role":"assistant","content":[{"type":"text","text":"Hi"}],"stop_reason":"end_turn"}"#;
    assert_eq!(
        reconstruct_reply(anthropic, false),
        Some(json!([{ "type": "text", "text": "Hi" }]))
    );

    let openai = r#"{"id":"c1","object":"chat.completion","choices":[{"index":0,"message":{"role":"assistant","content":"Hello!"}}]}"#;
    assert_eq!(reconstruct_reply(openai, false), Some(json!("Hello!")));
}

#[test]
fn bodies_without_content_yield_nothing() {
    assert_eq!(reconstruct_reply(r#"{"input_tokens": 42}"#, false), None);
    assert_eq!(reconstruct_reply(r#"{"content": []}"#, false), None);
    assert_eq!(reconstruct_reply("event: ping\ndata: {}\n\n", true), None);
    assert_eq!(reconstruct_reply("<html>502</html>", false), None);
}
