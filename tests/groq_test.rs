//! Wiremock integration tests for GroqClient.
//!
//! These tests verify the request shape and the mapping of error responses.

use std::time::Duration;

use huginn::providers::{CompletionClient, GroqClient};
use huginn::{ChatRequest, Gateway, Huginn, HuginnError, Message};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request() -> ChatRequest {
    ChatRequest::new("llama-test", vec![Message::user("hello")])
        .temperature(0.5)
        .max_tokens(128)
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn test_complete_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test_key"))
        .and(body_partial_json(json!({
            "model": "llama-test",
            "messages": [{"role": "user", "content": "hello"}],
            "temperature": 0.5,
            "max_tokens": 128
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("hi there")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GroqClient::with_base_url(mock_server.uri()).unwrap();
    let text = client.complete("test_key", &request()).await.unwrap();

    assert_eq!(text, "hi there");
}

#[tokio::test]
async fn test_missing_content_is_empty_string() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&mock_server)
        .await;

    let client = GroqClient::with_base_url(mock_server.uri()).unwrap();
    let text = client.complete("test_key", &request()).await.unwrap();

    assert_eq!(text, "");
}

#[tokio::test]
async fn test_null_content_is_empty_string() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        })))
        .mount(&mock_server)
        .await;

    let client = GroqClient::with_base_url(mock_server.uri()).unwrap();
    assert_eq!(client.complete("test_key", &request()).await.unwrap(), "");
}

#[tokio::test]
async fn test_malformed_body_is_json_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway timeout</html>"))
        .mount(&mock_server)
        .await;

    let client = GroqClient::with_base_url(mock_server.uri()).unwrap();
    let err = client.complete("test_key", &request()).await.unwrap_err();

    assert!(matches!(err, HuginnError::Json(_)));
    assert!(!err.is_rate_limited());
}

#[tokio::test]
async fn test_rate_limit_429_with_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "7")
                .set_body_json(json!({"error": {"message": "Rate limit reached for model"}})),
        )
        .mount(&mock_server)
        .await;

    let client = GroqClient::with_base_url(mock_server.uri()).unwrap();
    let err = client.complete("test_key", &request()).await.unwrap_err();

    assert!(err.is_rate_limited());
    assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
}

#[tokio::test]
async fn test_rate_limit_message_without_429() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"error": {"message": "rate_limit_exceeded on tokens"}})),
        )
        .mount(&mock_server)
        .await;

    let client = GroqClient::with_base_url(mock_server.uri()).unwrap();
    let err = client.complete("test_key", &request()).await.unwrap_err();

    assert!(err.is_rate_limited());
}

#[tokio::test]
async fn test_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": {"message": "Invalid API Key"}})),
        )
        .mount(&mock_server)
        .await;

    let client = GroqClient::with_base_url(mock_server.uri()).unwrap();
    let err = client.complete("bad_key", &request()).await.unwrap_err();

    assert!(matches!(err, HuginnError::AuthenticationFailed));
    assert!(!err.is_rate_limited());
}

#[tokio::test]
async fn test_model_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(404).set_body_json(
            json!({"error": {"message": "The model `llama-test` does not exist"}}),
        ))
        .mount(&mock_server)
        .await;

    let client = GroqClient::with_base_url(mock_server.uri()).unwrap();
    let err = client.complete("test_key", &request()).await.unwrap_err();

    assert!(matches!(err, HuginnError::ModelNotFound(_)));
}

#[tokio::test]
async fn test_server_error_keeps_body_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&mock_server)
        .await;

    let client = GroqClient::with_base_url(mock_server.uri()).unwrap();
    let err = client.complete("test_key", &request()).await.unwrap_err();

    match err {
        HuginnError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream exploded");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .mount(&mock_server)
        .await;

    let client = GroqClient::with_base_url(format!("{}/", mock_server.uri())).unwrap();
    assert_eq!(client.complete("k", &request()).await.unwrap(), "ok");
}

/// Full path: gateway rotates from a rate-limited key to a working one.
#[tokio::test]
async fn test_gateway_rotates_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer key-a"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({"error": {"message": "slow down"}})),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer key-b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("from b")))
        .mount(&mock_server)
        .await;

    let gateway = Huginn::builder()
        .base_url(mock_server.uri())
        .timeout(5)
        .api_keys(["key-a", "key-b"])
        .build()
        .unwrap();

    // No cache store: the counter is unreachable, so the start offset is
    // random; either way key-b answers.
    let text = gateway.invoke(&request().ttl(60)).await.unwrap();
    assert_eq!(text, "from b");
}
