//! HTTP-level tests for the inference and transcription clients.
//!
//! A wiremock server stands in for the remote endpoints.

use std::time::Duration;

use thoughts_common::InferenceError;
use thoughts_llm::{
    HuggingFaceClient, InferenceClient, InferenceRequest, RetryConfig, RetryingClient,
    Transcriber, WhisperClient,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/models/test/model";

fn client_for(server: &MockServer) -> HuggingFaceClient {
    HuggingFaceClient::new(
        Some(format!("{}{}", server.uri(), MODEL_PATH)),
        "hf_test".to_string(),
        0.3,
    )
}

fn retrying_client_for(server: &MockServer) -> RetryingClient<HuggingFaceClient> {
    RetryingClient::new(
        client_for(server),
        RetryConfig {
            max_retries: 1,
            backoff_ms: 10,
            retry_timeout_ms: 5_000,
        },
    )
}

fn request() -> InferenceRequest {
    InferenceRequest::new("Summarize: a note", 20, Duration::from_secs(5))
}

// ============================================================================
// Text generation
// ============================================================================

#[tokio::test]
async fn test_success_returns_generated_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("authorization", "Bearer hf_test"))
        .and(body_partial_json(serde_json::json!({
            "inputs": "Summarize: a note",
            "parameters": {"max_new_tokens": 20, "return_full_text": false}
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{"generated_text": "A short note"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let text = client_for(&server).infer(request()).await.unwrap();
    assert_eq!(text, "A short note");
}

#[tokio::test]
async fn test_empty_generated_text_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([{"generated_text": "  "}])),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).infer(request()).await.unwrap_err();
    assert_eq!(err, InferenceError::EmptyOutput);
}

#[tokio::test]
async fn test_malformed_body_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).infer(request()).await.unwrap_err();
    assert!(matches!(err, InferenceError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_unauthorized_is_terminal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .expect(1)
        .mount(&server)
        .await;

    let err = retrying_client_for(&server).infer(request()).await.unwrap_err();
    assert_eq!(err, InferenceError::status(401, "invalid token"));
}

#[tokio::test]
async fn test_timeout_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{"generated_text": "late"}]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let slow_request = request().with_timeout(Duration::from_millis(50));
    let err = client_for(&server).infer(slow_request).await.unwrap_err();
    assert_eq!(err, InferenceError::Timeout);
}

// ============================================================================
// Model loading retry
// ============================================================================

#[tokio::test]
async fn test_model_loading_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_json(serde_json::json!({"error": "Model is currently loading"})),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([{"generated_text": "ok"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let text = retrying_client_for(&server).infer(request()).await.unwrap();
    assert_eq!(text, "ok");
}

#[tokio::test]
async fn test_model_loading_twice_fails_after_one_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("loading"))
        .expect(2)
        .mount(&server)
        .await;

    let err = retrying_client_for(&server).infer(request()).await.unwrap_err();
    assert!(matches!(err, InferenceError::ModelLoading { .. }));
}

// ============================================================================
// Transcription
// ============================================================================

#[tokio::test]
async fn test_transcription_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({"inputs": "https://files/voice.ogg"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "Kupić mleko"})),
        )
        .mount(&server)
        .await;

    let whisper = WhisperClient::new(Some(server.uri()), "hf_test".into(), Duration::from_secs(5));
    assert_eq!(whisper.transcribe("https://files/voice.ogg").await, "Kupić mleko");
}

#[tokio::test]
async fn test_transcription_failure_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let whisper = WhisperClient::new(Some(server.uri()), "hf_test".into(), Duration::from_secs(5));
    assert_eq!(whisper.transcribe("https://files/voice.ogg").await, "");
}
