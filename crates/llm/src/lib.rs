pub mod client;
pub mod config;
pub mod huggingface;
pub mod retry;
pub mod transcribe;

pub use client::{InferenceClient, InferenceRequest, InferenceResult};
pub use config::{InferenceConfig, SemaphoredClient, build_inference_client, build_transcriber};
pub use huggingface::HuggingFaceClient;
pub use retry::{RetryConfig, RetryingClient};
pub use transcribe::{Transcriber, WhisperClient};
