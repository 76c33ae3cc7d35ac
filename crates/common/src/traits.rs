//! Storage trait implemented by the note stores.
//!
//! Defined here so the pipeline and the adapters can depend on it without
//! pulling in a concrete backend.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::{Category, CategoryStats, Note, ProcessedNote, Result};

/// Persistence for processed notes.
///
/// Implementations must be safe to share between concurrent submissions.
/// Errors are reserved for storage faults; note content is never rejected.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Persist a note and return it as stored, with its newly assigned id
    /// and timestamp.
    async fn save(&self, note: &ProcessedNote, user_id: &str) -> Result<Note>;

    /// Fetch a single note by id.
    async fn get(&self, id: i64) -> Result<Option<Note>>;

    /// Most recent notes of a user, newest first (by id, which follows
    /// insertion order), optionally filtered by category.
    async fn list_recent(
        &self,
        user_id: &str,
        category: Option<Category>,
        limit: usize,
    ) -> Result<Vec<Note>>;

    /// Number of notes per category for a user. Categories without notes
    /// are absent.
    async fn category_counts(&self, user_id: &str) -> Result<BTreeMap<Category, u64>>;

    /// Total number of notes for a user.
    async fn total(&self, user_id: &str) -> Result<u64>;

    /// Counts and total computed from the same snapshot.
    async fn stats(&self, user_id: &str) -> Result<CategoryStats> {
        Ok(CategoryStats::from_counts(self.category_counts(user_id).await?))
    }

    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &str;
}
