use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thoughts_common::InferenceError;

pub type InferenceResult<T> = std::result::Result<T, InferenceError>;

/// A single text-generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceRequest {
    pub prompt: String,
    pub max_new_tokens: u32,
    /// Per-attempt timeout for the HTTP exchange
    pub timeout: Duration,
}

impl InferenceRequest {
    pub fn new(prompt: impl Into<String>, max_new_tokens: u32, timeout: Duration) -> Self {
        Self {
            prompt: prompt.into(),
            max_new_tokens,
            timeout,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Remote text generation.
///
/// Implementations report every failure as an [`InferenceError`] and never
/// substitute canned text; callers own the fallback.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn infer(&self, request: InferenceRequest) -> InferenceResult<String>;
    fn model_name(&self) -> &str;
}

#[async_trait]
impl InferenceClient for Box<dyn InferenceClient> {
    async fn infer(&self, request: InferenceRequest) -> InferenceResult<String> {
        (**self).infer(request).await
    }
    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl InferenceClient for Arc<dyn InferenceClient> {
    async fn infer(&self, request: InferenceRequest) -> InferenceResult<String> {
        (**self).infer(request).await
    }
    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
