//! Per-message orchestration: transcribe, process, persist.

use std::sync::Arc;

use thoughts_common::{Category, CategoryStats, Note, NoteStore, Result, ThoughtsError};
use thoughts_llm::{Transcriber, build_inference_client, build_transcriber};
use thoughts_store::open_store;
use tracing::{error, info};

use crate::config::ThoughtsConfig;
use crate::processor::NoteProcessor;

/// Notes listed when no category filter is given.
pub const DEFAULT_LIST_LIMIT: usize = 5;

/// Notes listed for a single category.
pub const DEFAULT_FILTERED_LIMIT: usize = 20;

/// Entry point for transport adapters. One call per inbound message.
pub struct NoteService {
    processor: NoteProcessor,
    store: Arc<dyn NoteStore>,
    transcriber: Option<Arc<dyn Transcriber>>,
}

impl NoteService {
    pub fn new(processor: NoteProcessor, store: Arc<dyn NoteStore>) -> Self {
        Self {
            processor,
            store,
            transcriber: None,
        }
    }

    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    /// Wire processor, store and transcriber from a loaded configuration.
    pub async fn from_config(config: &ThoughtsConfig) -> Result<Self> {
        let inference = build_inference_client(&config.inference)?;
        let processor = NoteProcessor::new(
            inference,
            config.processing.clone(),
            config.inference.timeout(),
        );
        let store = open_store(&config.store).await?;

        let mut service = Self::new(processor, store);
        if let Some(transcriber) = build_transcriber(&config.inference)? {
            service = service.with_transcriber(transcriber);
        }

        info!(
            store = service.store.backend_name(),
            remote = service.remote_enabled(),
            voice = service.voice_enabled(),
            "Note service ready"
        );
        Ok(service)
    }

    pub fn remote_enabled(&self) -> bool {
        self.processor.remote_enabled()
    }

    pub fn voice_enabled(&self) -> bool {
        self.transcriber.is_some()
    }

    pub fn store(&self) -> &Arc<dyn NoteStore> {
        &self.store
    }

    /// Process and persist one text note. Nothing is saved when validation
    /// fails.
    pub async fn submit(&self, text: &str, user_id: &str) -> Result<Note> {
        let processed = self.processor.process(text, user_id).await?;

        self.store.save(&processed, user_id).await.inspect_err(|e| {
            error!(user_id, error = %e, "Failed to persist note");
        })
    }

    /// Transcribe and submit a voice note. `Ok(None)` when nothing was
    /// recognized.
    pub async fn submit_voice(&self, audio_ref: &str, user_id: &str) -> Result<Option<Note>> {
        let Some(transcriber) = self.transcriber.as_ref() else {
            return Err(ThoughtsError::Config(
                "voice notes need transcription credentials".into(),
            ));
        };

        let text = transcriber.transcribe(audio_ref).await;
        if text.trim().is_empty() {
            info!(user_id, "Transcription came back empty");
            return Ok(None);
        }

        self.submit(&text, user_id).await.map(Some)
    }

    /// Newest notes first. `limit` defaults to [`DEFAULT_LIST_LIMIT`], or
    /// [`DEFAULT_FILTERED_LIMIT`] when filtering by category.
    pub async fn list_recent(
        &self,
        user_id: &str,
        category: Option<Category>,
        limit: Option<usize>,
    ) -> Result<Vec<Note>> {
        let limit = limit.unwrap_or(match category {
            Some(_) => DEFAULT_FILTERED_LIMIT,
            None => DEFAULT_LIST_LIMIT,
        });
        self.store.list_recent(user_id, category, limit).await
    }

    pub async fn stats(&self, user_id: &str) -> Result<CategoryStats> {
        self.store.stats(user_id).await
    }
}
