//! Integration tests for the API layer.
//!
//! These tests spin up a real HTTP server on a random port backed by an
//! in-memory store and drive it with `reqwest`.

use std::sync::Arc;
use std::time::Duration;

use thoughts_api::{AppState, create_router};
use thoughts_llm::WhisperClient;
use thoughts_pipeline::{NoteProcessor, NoteService, ProcessingConfig};
use thoughts_store::InMemoryNoteStore;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn local_service() -> NoteService {
    NoteService::new(
        NoteProcessor::local_only(ProcessingConfig::default()),
        Arc::new(InMemoryNoteStore::new()),
    )
}

/// Spin up a test server on a random port and return the base URL.
async fn start_server(service: NoteService) -> String {
    let state = Arc::new(AppState::new(service));
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn start_test_server() -> String {
    start_server(local_service()).await
}

/// Helper to GET a URL and return (status, body_json).
async fn get(base: &str, path: &str) -> (u16, serde_json::Value) {
    let resp = reqwest::Client::new()
        .get(format!("{}{}", base, path))
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let body = resp.json().await.unwrap_or(serde_json::Value::Null);
    (status, body)
}

/// Helper to POST JSON and return (status, body_json).
async fn post_json(base: &str, path: &str, json: serde_json::Value) -> (u16, serde_json::Value) {
    let resp = reqwest::Client::new()
        .post(format!("{}{}", base, path))
        .json(&json)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let body = resp.json().await.unwrap_or(serde_json::Value::Null);
    (status, body)
}

async fn submit(base: &str, user_id: &str, text: &str) -> (u16, serde_json::Value) {
    post_json(
        base,
        "/api/v1/notes",
        serde_json::json!({"user_id": user_id, "text": text}),
    )
    .await
}

// ============================================================================
// Health / help
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let base = start_test_server().await;
    let (status, body) = get(&base, "/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["inference_enabled"], false);
}

#[tokio::test]
async fn test_help_endpoint() {
    let base = start_test_server().await;
    let (status, body) = get(&base, "/api/v1/help").await;
    assert_eq!(status, 200);
    assert!(body["message"].as_str().unwrap().contains("/api/v1/notes"));
}

// ============================================================================
// Submitting notes
// ============================================================================

#[tokio::test]
async fn test_keyword_note_is_created_with_emoji() {
    let base = start_test_server().await;
    let (status, body) = submit(&base, "alice", "Mam pomysł na nowy startup").await;

    assert_eq!(status, 201);
    assert_eq!(body["note"]["category"], "project");
    assert_eq!(body["note"]["summary"], "Mam pomysł na nowy startup");
    assert_eq!(body["note"]["user_id"], "alice");
    assert!(body["message"].as_str().unwrap().contains("🚀"));
}

#[tokio::test]
async fn test_short_note_is_rejected() {
    let base = start_test_server().await;
    let (status, body) = submit(&base, "alice", "ab").await;

    assert_eq!(status, 400);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["error"].as_str().unwrap().contains("too short"));

    let (_, stats) = get(&base, "/api/v1/stats?user_id=alice").await;
    assert_eq!(stats["total"], 0);
}

#[tokio::test]
async fn test_empty_user_id_is_rejected() {
    let base = start_test_server().await;
    let (status, body) = submit(&base, "  ", "Spotkanie o 10").await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// ============================================================================
// Listing / stats
// ============================================================================

#[tokio::test]
async fn test_list_by_category() {
    let base = start_test_server().await;
    for text in ["Spotkanie o 10", "Deadline w piątek", "Telefon do klienta"] {
        assert_eq!(submit(&base, "alice", text).await.0, 201);
    }
    for text in ["Ładna pogoda dziś", "Zwykły wtorek"] {
        assert_eq!(submit(&base, "alice", text).await.0, 201);
    }

    let (status, body) = get(&base, "/api/v1/notes?user_id=alice&category=work").await;
    assert_eq!(status, 200);
    let notes = body["notes"].as_array().unwrap();
    assert_eq!(notes.len(), 3);
    assert_eq!(notes[0]["text"], "Telefon do klienta");
    assert!(notes.iter().all(|n| n["category"] == "work"));

    // Polish alias resolves to the same category
    let (_, body) = get(&base, "/api/v1/notes?user_id=alice&category=praca").await;
    assert_eq!(body["notes"].as_array().unwrap().len(), 3);

    let (_, body) = get(&base, "/api/v1/notes?user_id=alice&limit=2").await;
    assert_eq!(body["notes"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_unknown_category_is_rejected() {
    let base = start_test_server().await;
    let (status, body) = get(&base, "/api/v1/notes?user_id=alice&category=cooking").await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_empty_list_has_message() {
    let base = start_test_server().await;
    let (status, body) = get(&base, "/api/v1/notes?user_id=nobody").await;
    assert_eq!(status, 200);
    assert!(body["notes"].as_array().unwrap().is_empty());
    assert!(body["message"].as_str().unwrap().contains("no notes"));
}

#[tokio::test]
async fn test_stats_counts_sum_to_total() {
    let base = start_test_server().await;
    for text in ["Spotkanie o 10", "Nowy kurs Rusta", "Zwykły wtorek", "Kod review na github"] {
        assert_eq!(submit(&base, "alice", text).await.0, 201);
    }
    submit(&base, "bob", "Spotkanie z zarządem").await;

    let (status, body) = get(&base, "/api/v1/stats?user_id=alice").await;
    assert_eq!(status, 200);
    let counts = body["counts"].as_object().unwrap();
    let sum: u64 = counts.values().map(|v| v.as_u64().unwrap()).sum();
    assert_eq!(body["total"], 4);
    assert_eq!(sum, 4);
    assert_eq!(counts["technology"], 1);
    assert!(body["message"].as_str().unwrap().contains("Total: 4"));
}

// ============================================================================
// Voice notes
// ============================================================================

async fn voice_service(transcript: &str) -> (MockServer, NoteService) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": transcript})))
        .mount(&server)
        .await;

    let whisper = WhisperClient::new(
        Some(format!("{}/models/openai/whisper-base", server.uri())),
        "hf_test".to_string(),
        Duration::from_secs(5),
    );
    let service = local_service().with_transcriber(Arc::new(whisper));
    (server, service)
}

#[tokio::test]
async fn test_voice_note_is_transcribed_and_saved() {
    let (_server, service) = voice_service("Artykuł o nauce języków").await;
    let base = start_server(service).await;

    let (status, body) = post_json(
        &base,
        "/api/v1/notes/voice",
        serde_json::json!({"user_id": "alice", "audio_url": "https://cdn/voice.ogg"}),
    )
    .await;

    assert_eq!(status, 201);
    assert_eq!(body["note"]["category"], "learning");
    assert_eq!(body["note"]["text"], "Artykuł o nauce języków");
}

#[tokio::test]
async fn test_empty_transcription_is_unprocessable() {
    let (_server, service) = voice_service("  ").await;
    let base = start_server(service).await;

    let (status, body) = post_json(
        &base,
        "/api/v1/notes/voice",
        serde_json::json!({"user_id": "alice", "audio_url": "https://cdn/silence.ogg"}),
    )
    .await;

    assert_eq!(status, 422);
    assert_eq!(body["code"], "TRANSCRIPTION_EMPTY");
}

#[tokio::test]
async fn test_voice_without_transcriber_is_unavailable() {
    let base = start_test_server().await;
    let (status, body) = post_json(
        &base,
        "/api/v1/notes/voice",
        serde_json::json!({"user_id": "alice", "audio_url": "https://cdn/voice.ogg"}),
    )
    .await;

    assert_eq!(status, 503);
    assert_eq!(body["code"], "UNAVAILABLE");
}
