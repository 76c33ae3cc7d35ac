//! Core note processor.

use std::sync::Arc;
use std::time::Duration;

use thoughts_common::text::{char_len, truncate_chars};
use thoughts_common::{Category, MAX_SUMMARY_CHARS, MIN_NOTE_CHARS, ProcessedNote, Result, ThoughtsError};
use thoughts_llm::{InferenceClient, InferenceRequest};
use tracing::{debug, info, warn};

use crate::classifier::KeywordClassifier;
use crate::config::ProcessingConfig;
use crate::prompts::{category_prompt, clean_summary, local_summary, parse_category, summary_prompt};

/// Turns raw note text into a summary and a category.
///
/// Keyword classification runs first. The remote model is consulted only
/// when keywords find nothing (category) or the note is long (summary), and
/// only when a client is configured. Both remote calls run concurrently, and
/// each degrades to a local result on failure, so [`NoteProcessor::process`]
/// fails for validation reasons only.
pub struct NoteProcessor {
    classifier: KeywordClassifier,
    inference: Option<Arc<dyn InferenceClient>>,
    config: ProcessingConfig,
    /// Per-call timeout handed to the inference client
    timeout: Duration,
}

impl NoteProcessor {
    pub fn new(
        inference: Option<Arc<dyn InferenceClient>>,
        config: ProcessingConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            classifier: KeywordClassifier::new(),
            inference,
            config,
            timeout,
        }
    }

    /// A processor that never leaves the machine.
    pub fn local_only(config: ProcessingConfig) -> Self {
        Self::new(None, config, Duration::ZERO)
    }

    pub fn remote_enabled(&self) -> bool {
        self.inference.is_some()
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    /// Derive summary and category for one note.
    ///
    /// Returns [`ThoughtsError::Validation`] when the trimmed note is shorter
    /// than [`MIN_NOTE_CHARS`]; never fails because of the remote model.
    pub async fn process(&self, text: &str, user_id: &str) -> Result<ProcessedNote> {
        let trimmed = text.trim();
        let length = char_len(trimmed);
        if length < MIN_NOTE_CHARS {
            debug!(user_id, length, "Rejecting short note");
            return Err(ThoughtsError::Validation(format!(
                "note is too short, at least {MIN_NOTE_CHARS} characters are required"
            )));
        }

        let keyword_category = self.classifier.classify(trimmed);

        let (category, summary) = tokio::join!(
            self.resolve_category(trimmed, length, keyword_category),
            self.resolve_summary(trimmed, length),
        );

        info!(
            user_id,
            length,
            category = %category,
            keyword_hit = keyword_category != Category::Other,
            "Note processed"
        );

        Ok(ProcessedNote {
            text: text.to_string(),
            summary,
            category,
        })
    }

    async fn resolve_category(&self, text: &str, length: usize, keyword: Category) -> Category {
        if keyword != Category::Other {
            return keyword;
        }
        let Some(client) = self.inference.as_ref() else {
            return Category::Other;
        };
        if length <= self.config.category_min_chars {
            return Category::Other;
        }

        let prompt = category_prompt(text);
        let request =
            InferenceRequest::new(prompt.clone(), self.config.category_max_tokens, self.timeout);

        match client.infer(request).await {
            Ok(response) => {
                let category = parse_category(&response, &prompt);
                debug!(category = %category, "Remote categorization");
                category
            }
            Err(e) => {
                warn!(error = %e, "Remote categorization failed, using other");
                Category::Other
            }
        }
    }

    async fn resolve_summary(&self, text: &str, length: usize) -> String {
        if length <= self.config.summary_threshold_chars {
            return truncate_chars(text, MAX_SUMMARY_CHARS);
        }
        let fallback = || local_summary(text, self.config.fallback_summary_chars);
        let Some(client) = self.inference.as_ref() else {
            return fallback();
        };

        let prompt = summary_prompt(text);
        let request =
            InferenceRequest::new(prompt.clone(), self.config.summary_max_tokens, self.timeout);

        match client.infer(request).await {
            Ok(response) => clean_summary(&response, &prompt).unwrap_or_else(|| {
                warn!("Remote summary was empty after cleanup, truncating locally");
                fallback()
            }),
            Err(e) => {
                warn!(error = %e, "Remote summarization failed, truncating locally");
                fallback()
            }
        }
    }
}
