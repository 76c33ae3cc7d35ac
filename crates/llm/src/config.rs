use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thoughts_common::{InferenceError, Result, ThoughtsError};
use tracing::info;

use crate::client::{InferenceClient, InferenceRequest, InferenceResult};
use crate::huggingface::{DEFAULT_API_URL, HuggingFaceClient};
use crate::retry::{RetryConfig, RetryingClient};
use crate::transcribe::{DEFAULT_TRANSCRIPTION_URL, Transcriber, WhisperClient};

/// Environment variable consulted when no token is set in the file.
pub const API_TOKEN_ENV: &str = "HF_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Master switch; when off the pipeline runs purely on local heuristics
    pub enabled: bool,
    /// Text-generation endpoint
    pub api_url: String,
    /// Speech-to-text endpoint
    pub transcription_url: String,
    /// Bearer token. Falls back to `HF_TOKEN` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    pub temperature: f32,
    pub timeout_ms: u64,
    pub transcription_timeout_ms: u64,
    pub max_concurrent_requests: usize,
    pub retry: RetryConfig,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: DEFAULT_API_URL.to_string(),
            transcription_url: DEFAULT_TRANSCRIPTION_URL.to_string(),
            api_token: None,
            temperature: 0.3,
            timeout_ms: 30_000,
            transcription_timeout_ms: 45_000,
            max_concurrent_requests: 4,
            retry: RetryConfig::default(),
        }
    }
}

impl InferenceConfig {
    /// Resolve the API token from config or the environment.
    ///
    /// Empty values count as unset.
    pub fn resolve_api_token(&self) -> Option<String> {
        self.api_token
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                std::env::var(API_TOKEN_ENV)
                    .ok()
                    .filter(|key| !key.trim().is_empty())
            })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("api_url", &self.api_url),
            ("transcription_url", &self.transcription_url),
        ] {
            reqwest::Url::parse(url).map_err(|e| {
                ThoughtsError::Config(format!("Invalid inference {name} '{url}': {e}"))
            })?;
        }
        if self.max_concurrent_requests == 0 {
            return Err(ThoughtsError::Config(
                "max_concurrent_requests must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Caps the number of in-flight inference calls.
pub struct SemaphoredClient {
    inner: Arc<dyn InferenceClient>,
    semaphore: Arc<tokio::sync::Semaphore>,
}

impl SemaphoredClient {
    pub fn new(inner: Arc<dyn InferenceClient>, max_concurrent: usize) -> Self {
        Self {
            inner,
            semaphore: Arc::new(tokio::sync::Semaphore::new(max_concurrent)),
        }
    }
}

#[async_trait]
impl InferenceClient for SemaphoredClient {
    async fn infer(&self, request: InferenceRequest) -> InferenceResult<String> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| InferenceError::Transport(format!("Semaphore acquire failed: {e}")))?;
        self.inner.infer(request).await
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}

/// Build the layered inference client, or `None` when remote inference is
/// disabled or no credentials are available.
pub fn build_inference_client(config: &InferenceConfig) -> Result<Option<Arc<dyn InferenceClient>>> {
    if !config.enabled {
        info!("Remote inference disabled by configuration");
        return Ok(None);
    }
    config.validate()?;

    let Some(token) = config.resolve_api_token() else {
        info!("No inference token configured, running on local heuristics only");
        return Ok(None);
    };

    let base_client: Box<dyn InferenceClient> = Box::new(HuggingFaceClient::new(
        Some(config.api_url.clone()),
        token,
        config.temperature,
    ));

    let retrying: Box<dyn InferenceClient> =
        Box::new(RetryingClient::new(base_client, config.retry.clone()));

    let semaphored = SemaphoredClient::new(Arc::from(retrying), config.max_concurrent_requests);

    info!(model = %semaphored.model_name(), "Remote inference enabled");
    Ok(Some(Arc::new(semaphored)))
}

/// Build the speech-to-text client under the same credential rules as
/// [`build_inference_client`].
pub fn build_transcriber(config: &InferenceConfig) -> Result<Option<Arc<dyn Transcriber>>> {
    if !config.enabled {
        return Ok(None);
    }
    config.validate()?;

    Ok(config.resolve_api_token().map(|token| {
        Arc::new(WhisperClient::new(
            Some(config.transcription_url.clone()),
            token,
            Duration::from_millis(config.transcription_timeout_ms),
        )) as Arc<dyn Transcriber>
    }))
}
