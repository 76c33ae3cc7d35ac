//! SQLite note store on a sqlx connection pool.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use thoughts_common::{Category, Note, NoteStore, ProcessedNote, Result, ThoughtsError};
use tracing::{debug, info};

const CREATE_NOTES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL,
    summary TEXT NOT NULL,
    category TEXT NOT NULL,
    created_at TEXT NOT NULL,
    user_id TEXT NOT NULL
)"#;

const CREATE_USER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_notes_user ON notes (user_id, id)";

const NOTE_COLUMNS: &str = "id, text, summary, category, created_at, user_id";

#[derive(sqlx::FromRow)]
struct NoteRow {
    id: i64,
    text: String,
    summary: String,
    category: String,
    created_at: DateTime<Utc>,
    user_id: String,
}

impl TryFrom<NoteRow> for Note {
    type Error = ThoughtsError;

    fn try_from(row: NoteRow) -> Result<Self> {
        let category = row.category.parse::<Category>().map_err(|_| {
            ThoughtsError::Persistence(format!(
                "note {} has unknown category '{}'",
                row.id, row.category
            ))
        })?;
        Ok(Note {
            id: row.id,
            text: row.text,
            summary: row.summary,
            category,
            created_at: row.created_at,
            user_id: row.user_id,
        })
    }
}

fn persistence(context: &str, e: sqlx::Error) -> ThoughtsError {
    ThoughtsError::Persistence(format!("{context}: {e}"))
}

/// Notes table in a SQLite file.
pub struct SqliteNoteStore {
    pool: SqlitePool,
}

impl SqliteNoteStore {
    /// Open (creating if needed) the database at `path` and bootstrap the
    /// schema.
    pub async fn open(path: &Path, max_connections: u32) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        info!(db_path = %path.display(), max_connections, "Opening note database");

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(|e| persistence("Failed to connect to database", e))?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        for statement in [CREATE_NOTES_TABLE, CREATE_USER_INDEX] {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| persistence("Schema bootstrap failed", e))?;
        }
        Ok(())
    }

    /// Close all pooled connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl NoteStore for SqliteNoteStore {
    async fn save(&self, note: &ProcessedNote, user_id: &str) -> Result<Note> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO notes (text, summary, category, created_at, user_id) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&note.text)
        .bind(&note.summary)
        .bind(note.category.label())
        .bind(created_at)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| persistence("Failed to insert note", e))?;

        let id = result.last_insert_rowid();
        debug!(id, user_id, category = %note.category, "Note persisted");
        Ok(Note {
            id,
            text: note.text.clone(),
            summary: note.summary.clone(),
            category: note.category,
            created_at,
            user_id: user_id.to_string(),
        })
    }

    async fn get(&self, id: i64) -> Result<Option<Note>> {
        let row: Option<NoteRow> =
            sqlx::query_as(&format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| persistence("Failed to load note", e))?;
        row.map(Note::try_from).transpose()
    }

    async fn list_recent(
        &self,
        user_id: &str,
        category: Option<Category>,
        limit: usize,
    ) -> Result<Vec<Note>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<NoteRow> = match category {
            Some(category) => {
                sqlx::query_as(&format!(
                    "SELECT {NOTE_COLUMNS} FROM notes WHERE user_id = ? AND category = ? \
                     ORDER BY id DESC LIMIT ?"
                ))
                .bind(user_id)
                .bind(category.label())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {NOTE_COLUMNS} FROM notes WHERE user_id = ? \
                     ORDER BY id DESC LIMIT ?"
                ))
                .bind(user_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| persistence("Failed to list notes", e))?;

        rows.into_iter().map(Note::try_from).collect()
    }

    async fn category_counts(&self, user_id: &str) -> Result<BTreeMap<Category, u64>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT category, COUNT(*) FROM notes WHERE user_id = ? GROUP BY category",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| persistence("Failed to count notes", e))?;

        let mut counts = BTreeMap::new();
        for (label, count) in rows {
            let category = label.parse::<Category>().map_err(|_| {
                ThoughtsError::Persistence(format!("unknown category '{label}' in notes table"))
            })?;
            *counts.entry(category).or_insert(0) += count as u64;
        }
        Ok(counts)
    }

    async fn total(&self, user_id: &str) -> Result<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| persistence("Failed to count notes", e))?;
        Ok(total as u64)
    }

    fn backend_name(&self) -> &str {
        "sqlite"
    }
}
