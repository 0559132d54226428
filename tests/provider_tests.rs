//! HTTP behavior of the built-in adapters against a mock server.

#![cfg(all(feature = "gemini", feature = "deepseek", feature = "openai"))]

use kimetsu_forge::error::{ErrorCategory, ForgeError};
use kimetsu_forge::provider::deepseek::DeepSeekAdapter;
use kimetsu_forge::provider::gemini::GeminiAdapter;
use kimetsu_forge::provider::openai::OpenAiAdapter;
use kimetsu_forge::provider::ProviderAdapter;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chat_reply(content: &str, finish_reason: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": finish_reason
        }]
    })
}

#[tokio::test]
async fn deepseek_posts_json_mode_chat_completion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer d-key"))
        .and(body_partial_json(json!({
            "model": "deepseek-chat",
            "response_format": { "type": "json_object" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("{\"nome\": \"x\"}", "stop")))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = DeepSeekAdapter::new("deepseek-chat".into(), server.uri());
    let text = adapter.complete("prompt", "d-key").await.unwrap();
    assert_eq!(text, "{\"nome\": \"x\"}");
}

#[tokio::test]
async fn openai_unauthorized_maps_to_authentication() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = OpenAiAdapter::new("gpt-4o-mini".into(), server.uri());
    let err = adapter.complete("prompt", "bad").await.unwrap_err();
    match &err {
        ForgeError::Authentication(message) => assert!(message.contains("Incorrect API key")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.category(), ErrorCategory::Authentication);
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn openai_content_filter_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("", "content_filter")))
        .mount(&server)
        .await;

    let adapter = OpenAiAdapter::new("gpt-4o-mini".into(), server.uri());
    let err = adapter.complete("prompt", "o-key").await.unwrap_err();
    assert!(matches!(err, ForgeError::ContentFiltered(_)));
}

#[tokio::test]
async fn rate_limit_carries_retry_hint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "slow down", "retry_after": 2.5 }
        })))
        .mount(&server)
        .await;

    let adapter = DeepSeekAdapter::new("deepseek-chat".into(), server.uri());
    let err = adapter.complete("prompt", "d-key").await.unwrap_err();
    assert!(matches!(err, ForgeError::RateLimited { retry_after_ms: Some(2500) }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn gemini_sends_key_in_header_and_joins_parts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .and(header("x-goog-api-key", "g-key"))
        .and(body_partial_json(json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"nome\": " }, { "text": "\"Kaede\"}" }] },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = GeminiAdapter::new("gemini-1.5-flash".into(), server.uri());
    let text = adapter.complete("prompt", "g-key").await.unwrap();
    assert_eq!(text, "{\"nome\": \"Kaede\"}");
}

#[tokio::test]
async fn gemini_safety_block_is_content_filtered() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        })))
        .mount(&server)
        .await;

    let adapter = GeminiAdapter::new("gemini-1.5-flash".into(), server.uri());
    let err = adapter.complete("prompt", "g-key").await.unwrap_err();
    assert!(matches!(err, ForgeError::ContentFiltered(_)));
    assert_eq!(err.category(), ErrorCategory::ContentFilter);
}

#[tokio::test]
async fn gemini_blocked_prompt_is_content_filtered() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "OTHER" }
        })))
        .mount(&server)
        .await;

    let adapter = GeminiAdapter::new("gemini-1.5-flash".into(), server.uri());
    let err = adapter.complete("prompt", "g-key").await.unwrap_err();
    match err {
        ForgeError::ContentFiltered(reason) => assert!(reason.contains("OTHER")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn gemini_server_error_keeps_provider_code() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": { "code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE" }
        })))
        .mount(&server)
        .await;

    let adapter = GeminiAdapter::new("gemini-1.5-flash".into(), server.uri());
    let err = adapter.complete("prompt", "g-key").await.unwrap_err();
    match &err {
        ForgeError::Api { status, message, details } => {
            assert_eq!(*status, 503);
            assert!(message.contains("overloaded"));
            assert_eq!(
                details.as_ref().and_then(|d| d.provider_code.as_deref()),
                Some("UNAVAILABLE")
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_retryable());
}
