//! In-memory note store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use thoughts_common::{Category, Note, NoteStore, ProcessedNote, Result};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct Inner {
    notes: Vec<Note>,
    next_id: i64,
}

/// Keeps notes in insertion order; ids start at 1.
#[derive(Default)]
pub struct InMemoryNoteStore {
    inner: RwLock<Inner>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.notes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn save(&self, note: &ProcessedNote, user_id: &str) -> Result<Note> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let id = inner.next_id;
        let stored = Note {
            id,
            text: note.text.clone(),
            summary: note.summary.clone(),
            category: note.category,
            created_at: Utc::now(),
            user_id: user_id.to_string(),
        };
        inner.notes.push(stored.clone());
        debug!(id, user_id, category = %note.category, "Note stored in memory");
        Ok(stored)
    }

    async fn get(&self, id: i64) -> Result<Option<Note>> {
        let inner = self.inner.read().await;
        Ok(inner.notes.iter().find(|n| n.id == id).cloned())
    }

    async fn list_recent(
        &self,
        user_id: &str,
        category: Option<Category>,
        limit: usize,
    ) -> Result<Vec<Note>> {
        let inner = self.inner.read().await;
        Ok(inner
            .notes
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .filter(|n| category.map_or(true, |c| n.category == c))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn category_counts(&self, user_id: &str) -> Result<BTreeMap<Category, u64>> {
        let inner = self.inner.read().await;
        let mut counts = BTreeMap::new();
        for note in inner.notes.iter().filter(|n| n.user_id == user_id) {
            *counts.entry(note.category).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn total(&self, user_id: &str) -> Result<u64> {
        let inner = self.inner.read().await;
        Ok(inner.notes.iter().filter(|n| n.user_id == user_id).count() as u64)
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
