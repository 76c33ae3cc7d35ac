use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::client::{InferenceClient, InferenceRequest, InferenceResult};

/// Policy for reissuing a request while the remote model is loading.
///
/// Only 503 responses are retried. Every other failure is returned on the
/// first attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    /// Fixed wait before each retry
    pub backoff_ms: u64,
    /// Timeout applied to retried attempts when it exceeds the original one
    pub retry_timeout_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 1,
            backoff_ms: 10_000,
            retry_timeout_ms: 60_000,
        }
    }
}

pub struct RetryingClient<T: InferenceClient> {
    inner: T,
    config: RetryConfig,
}

impl<T: InferenceClient> RetryingClient<T> {
    pub fn new(inner: T, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    fn retry_timeout(&self, original: Duration) -> Duration {
        original.max(Duration::from_millis(self.config.retry_timeout_ms))
    }
}

#[async_trait]
impl<T: InferenceClient> InferenceClient for RetryingClient<T> {
    async fn infer(&self, request: InferenceRequest) -> InferenceResult<String> {
        let retry_timeout = self.retry_timeout(request.timeout);
        let mut attempt_request = request;
        let mut attempt = 0;

        loop {
            match self.inner.infer(attempt_request.clone()).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    if attempt >= self.config.max_retries || !e.is_retryable() {
                        return Err(e);
                    }
                    attempt += 1;

                    warn!(
                        attempt,
                        max_retries = self.config.max_retries,
                        delay_ms = self.config.backoff_ms,
                        timeout_ms = retry_timeout.as_millis() as u64,
                        error = %e,
                        "Model loading, retrying inference request"
                    );

                    tokio::time::sleep(Duration::from_millis(self.config.backoff_ms)).await;
                    attempt_request = attempt_request.with_timeout(retry_timeout);
                }
            }
        }
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
