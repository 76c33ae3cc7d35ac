//! Store selection.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thoughts_common::{NoteStore, Result};
use tracing::info;

use crate::memory::InMemoryNoteStore;
use crate::sqlite::SqliteNoteStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// SQLite database file
    pub db_path: PathBuf,
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            db_path: PathBuf::from("thoughts.db"),
            max_connections: 5,
        }
    }
}

/// Open the configured backend.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn NoteStore>> {
    match config.backend {
        StoreBackend::Sqlite => {
            let store = SqliteNoteStore::open(&config.db_path, config.max_connections).await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            info!("Using in-memory note store; notes are lost on exit");
            Ok(Arc::new(InMemoryNoteStore::new()))
        }
    }
}
