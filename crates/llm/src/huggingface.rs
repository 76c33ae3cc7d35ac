use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thoughts_common::InferenceError;
use tracing::debug;

use crate::client::{InferenceClient, InferenceRequest, InferenceResult};

pub(crate) const DEFAULT_API_URL: &str =
    "https://api-inference.huggingface.co/models/google/gemma-2b-it";

#[derive(Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    temperature: f32,
    return_full_text: bool,
}

/// The endpoint answers with either a one-element list or a bare object.
#[derive(Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    Batch(Vec<GeneratedText>),
    Single(GeneratedText),
}

#[derive(Deserialize)]
struct GeneratedText {
    #[serde(default)]
    generated_text: Option<String>,
}

impl GenerationResponse {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Batch(items) => items.into_iter().next().and_then(|g| g.generated_text),
            Self::Single(item) => item.generated_text,
        }
    }
}

/// Client for a Hugging Face style text-generation endpoint.
pub struct HuggingFaceClient {
    api_url: String,
    model: String,
    api_token: String,
    temperature: f32,
    http_client: reqwest::Client,
}

impl HuggingFaceClient {
    pub fn new(api_url: Option<String>, api_token: String, temperature: f32) -> Self {
        let api_url = api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let model = model_from_url(&api_url);
        Self {
            api_url,
            model,
            api_token,
            temperature,
            http_client: reqwest::Client::new(),
        }
    }

    fn build_body<'a>(&self, request: &'a InferenceRequest) -> GenerationRequest<'a> {
        GenerationRequest {
            inputs: &request.prompt,
            parameters: GenerationParameters {
                max_new_tokens: request.max_new_tokens,
                temperature: self.temperature,
                return_full_text: false,
            },
        }
    }
}

/// `.../models/<org>/<name>` → `<org>/<name>`; anything else is used as-is.
fn model_from_url(url: &str) -> String {
    match url.split_once("/models/") {
        Some((_, model)) if !model.is_empty() => model.trim_end_matches('/').to_string(),
        _ => url.to_string(),
    }
}

pub(crate) fn transport_error(e: reqwest::Error) -> InferenceError {
    if e.is_timeout() {
        InferenceError::Timeout
    } else {
        InferenceError::Transport(e.to_string())
    }
}

#[async_trait]
impl InferenceClient for HuggingFaceClient {
    async fn infer(&self, request: InferenceRequest) -> InferenceResult<String> {
        let body = self.build_body(&request);

        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(&self.api_token)
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            let body_text = response.text().await.unwrap_or_default();
            return Err(InferenceError::model_loading(&body_text));
        }
        if status != StatusCode::OK {
            let body_text = response.text().await.unwrap_or_default();
            return Err(InferenceError::status(status.as_u16(), &body_text));
        }

        let raw = response.text().await.map_err(transport_error)?;
        let parsed: GenerationResponse = serde_json::from_str(&raw)
            .map_err(|e| InferenceError::MalformedResponse(e.to_string()))?;

        let text = parsed
            .into_text()
            .filter(|t| !t.trim().is_empty())
            .ok_or(InferenceError::EmptyOutput)?;

        debug!(model = %self.model, chars = text.chars().count(), "Inference succeeded");
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn request_body_matches_generation_format() {
        let client = HuggingFaceClient::new(None, "hf_test".to_string(), 0.3);
        let request = InferenceRequest::new("Summarize: hi", 20, Duration::from_secs(30));

        let json = serde_json::to_value(client.build_body(&request)).unwrap();

        assert_eq!(json["inputs"], "Summarize: hi");
        assert_eq!(json["parameters"]["max_new_tokens"], 20);
        assert_eq!(json["parameters"]["return_full_text"], false);
        let temperature = json["parameters"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.3).abs() < 1e-6);
    }

    #[test]
    fn model_name_from_default_url() {
        let client = HuggingFaceClient::new(None, "hf_test".to_string(), 0.3);
        assert_eq!(client.model_name(), "google/gemma-2b-it");
    }

    #[test]
    fn model_name_falls_back_to_url() {
        assert_eq!(model_from_url("http://localhost:8080/generate"), "http://localhost:8080/generate");
    }

    #[test]
    fn response_accepts_list_and_object() {
        let list: GenerationResponse =
            serde_json::from_str(r#"[{"generated_text": "one"}]"#).unwrap();
        assert_eq!(list.into_text().as_deref(), Some("one"));

        let single: GenerationResponse =
            serde_json::from_str(r#"{"generated_text": "two"}"#).unwrap();
        assert_eq!(single.into_text().as_deref(), Some("two"));

        let empty: GenerationResponse = serde_json::from_str("[]").unwrap();
        assert!(empty.into_text().is_none());
    }
}
