//! Streaming tests: SSE bodies are served whole by the mock server but must
//! still parse event-by-event into text deltas.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fanyi::stream::collect;
use fanyi::{
    ChatGptTranslator, ClaudeTranslator, EngineOptions, GeminiTranslator, StreamingTranslator,
};

#[tokio::test]
async fn chatgpt_stream_collects_deltas() {
    let sse = concat!(
        "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"Bon\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"jour\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
        "data: [DONE]\n\n",
    );
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse, "text/event-stream"))
        .mount(&server)
        .await;

    let options = EngineOptions::new()
        .with("api_keys", json!(["sk-test"]))
        .with("endpoint", server.uri());
    let engine = ChatGptTranslator::new(&options).unwrap();
    let stream = engine
        .translate_stream("Hello", "English", "French")
        .await
        .unwrap();
    assert_eq!(collect(stream).await.unwrap(), "Bonjour");
}

#[tokio::test]
async fn claude_stream_skips_bookkeeping_events() {
    let sse = concat!(
        "event: message_start\n",
        "data: {\"type\":\"message_start\",\"message\":{\"role\":\"assistant\"}}\n\n",
        "event: content_block_start\n",
        "data: {\"type\":\"content_block_start\",\"index\":0}\n\n",
        "event: content_block_delta\n",
        "data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"Hal\"}}\n\n",
        "event: content_block_delta\n",
        "data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"lo\"}}\n\n",
        "event: message_stop\n",
        "data: {\"type\":\"message_stop\"}\n\n",
    );
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse, "text/event-stream"))
        .mount(&server)
        .await;

    let options = EngineOptions::new()
        .with("api_keys", json!(["sk-ant-test"]))
        .with("endpoint", format!("{}/v1/messages", server.uri()));
    let engine = ClaudeTranslator::new(&options).unwrap();
    let stream = engine
        .translate_stream("Hello", "English", "German")
        .await
        .unwrap();
    assert_eq!(collect(stream).await.unwrap(), "Hallo");
}

#[tokio::test]
async fn gemini_stream_parses_candidate_chunks() {
    let sse = concat!(
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Kon\"}]}}]}\n\n",
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"nichiwa\"}]}}]}\n\n",
    );
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:streamGenerateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse, "text/event-stream"))
        .mount(&server)
        .await;

    let options = EngineOptions::new()
        .with("api_keys", json!(["gm-key"]))
        .with("endpoint", server.uri());
    let engine = GeminiTranslator::new(&options).unwrap();
    let stream = engine
        .translate_stream("Hello", "English", "Japanese")
        .await
        .unwrap();
    assert_eq!(collect(stream).await.unwrap(), "Konnichiwa");
}

#[tokio::test]
async fn stream_error_status_fails_before_streaming() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"message": "Rate limit reached"}
        })))
        .mount(&server)
        .await;

    let options = EngineOptions::new()
        .with("api_keys", json!(["sk-test"]))
        .with("endpoint", server.uri());
    let engine = ChatGptTranslator::new(&options).unwrap();
    let err = engine
        .translate_stream("Hello", "English", "French")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Rate limit reached"));
}
