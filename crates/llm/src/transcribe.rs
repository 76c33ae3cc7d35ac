//! Speech-to-text collaborator used for voice notes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thoughts_common::InferenceError;
use tracing::{debug, warn};

use crate::client::InferenceResult;
use crate::huggingface::transport_error;

pub(crate) const DEFAULT_TRANSCRIPTION_URL: &str =
    "https://api-inference.huggingface.co/models/openai/whisper-base";

/// Turns an audio reference into plain text.
///
/// Returns an empty string when nothing could be recognized; callers treat
/// that as "nothing to process".
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_ref: &str) -> String;
}

#[derive(Serialize)]
struct TranscriptionRequest<'a> {
    inputs: &'a str,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

/// Whisper endpoint client. The audio is passed by URL.
pub struct WhisperClient {
    api_url: String,
    api_token: String,
    timeout: Duration,
    http_client: reqwest::Client,
}

impl WhisperClient {
    pub fn new(api_url: Option<String>, api_token: String, timeout: Duration) -> Self {
        Self {
            api_url: api_url.unwrap_or_else(|| DEFAULT_TRANSCRIPTION_URL.to_string()),
            api_token,
            timeout,
            http_client: reqwest::Client::new(),
        }
    }

    async fn try_transcribe(&self, audio_ref: &str) -> InferenceResult<String> {
        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(&self.api_token)
            .timeout(self.timeout)
            .json(&TranscriptionRequest { inputs: audio_ref })
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body_text = response.text().await.unwrap_or_default();
            return Err(InferenceError::status(status.as_u16(), &body_text));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::MalformedResponse(e.to_string()))?;
        Ok(parsed.text)
    }
}

#[async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe(&self, audio_ref: &str) -> String {
        match self.try_transcribe(audio_ref).await {
            Ok(text) => {
                debug!(chars = text.chars().count(), "Transcription finished");
                text
            }
            Err(e) => {
                warn!(error = %e, "Transcription failed");
                String::new()
            }
        }
    }
}
