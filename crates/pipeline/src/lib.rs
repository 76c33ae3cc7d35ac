//! Note-processing pipeline.
//!
//! Turns raw note text into a `(summary, category)` pair and persists it:
//! 1. Rejects notes that are too short
//! 2. Classifies locally by keyword, asking the remote model only when the
//!    keywords say nothing
//! 3. Summarizes long notes remotely, truncating locally when that fails
//! 4. Hands the result to a [`thoughts_common::NoteStore`]
//!
//! # Architecture
//!
//! ```text
//! text, user_id
//!      │
//!      ▼
//! ┌─────────────────┐      ┌───────────────────┐
//! │  NoteProcessor  │ ───► │ KeywordClassifier │
//! │                 │      └───────────────────┘
//! │                 │  join  ┌─────────────────┐
//! │                 │ ─────► │ InferenceClient │  (category ∥ summary)
//! └────────┬────────┘        └─────────────────┘
//!          │ ProcessedNote
//!          ▼
//!     NoteStore.save
//! ```

pub mod classifier;
pub mod config;
pub mod processor;
pub mod prompts;
pub mod service;

pub use classifier::KeywordClassifier;
pub use config::{ProcessingConfig, ServerConfig, ThoughtsConfig};
pub use processor::NoteProcessor;
pub use service::{NoteService, DEFAULT_FILTERED_LIMIT, DEFAULT_LIST_LIMIT};
