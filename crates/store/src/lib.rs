//! Note persistence for the thoughts pipeline.
//!
//! Two backends implement [`thoughts_common::NoteStore`]:
//!
//! - **SQLite** ([`SqliteNoteStore`]): a single `notes` table behind a sqlx
//!   connection pool, safe for concurrent submissions.
//! - **Memory** ([`InMemoryNoteStore`]): a lock-guarded vector for tests and
//!   throwaway runs.

pub mod config;
pub mod memory;
pub mod sqlite;

pub use config::{StoreBackend, StoreConfig, open_store};
pub use memory::InMemoryNoteStore;
pub use sqlite::SqliteNoteStore;
