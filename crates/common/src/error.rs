//! Error types for the thoughts pipeline.

use thiserror::Error;

/// Maximum number of characters of a response body kept in an error.
const BODY_SNIPPET_CHARS: usize = 200;

#[derive(Error, Debug)]
pub enum ThoughtsError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ThoughtsError>;

/// Failure of a single remote inference call.
///
/// These never leave the note processor; they are logged and replaced by a
/// local fallback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InferenceError {
    /// The endpoint answered 503 while the model was still loading.
    #[error("model is loading (503): {body}")]
    ModelLoading { body: String },

    #[error("inference endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("inference request timed out")]
    Timeout,

    #[error("inference request failed: {0}")]
    Transport(String),

    #[error("malformed inference response: {0}")]
    MalformedResponse(String),

    #[error("inference returned no generated text")]
    EmptyOutput,
}

impl InferenceError {
    /// Build a status error, keeping only a short prefix of the body.
    pub fn status(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            body: body_snippet(body),
        }
    }

    pub fn model_loading(body: &str) -> Self {
        Self::ModelLoading {
            body: body_snippet(body),
        }
    }

    /// Whether the call may be reissued after a backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ModelLoading { .. })
    }
}

fn body_snippet(body: &str) -> String {
    body.trim().chars().take(BODY_SNIPPET_CHARS).collect()
}
