//! Application state for the API server.

use std::sync::Arc;

use thoughts_pipeline::{NoteService, ThoughtsConfig};

/// Shared application state for the API server.
pub struct AppState {
    /// Note pipeline and storage
    pub service: Arc<NoteService>,

    /// Server start time (for health checks)
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(service: NoteService) -> Self {
        Self {
            service: Arc::new(service),
            start_time: std::time::Instant::now(),
        }
    }

    /// Build the service from configuration.
    pub async fn from_config(config: &ThoughtsConfig) -> thoughts_common::Result<Self> {
        Ok(Self::new(NoteService::from_config(config).await?))
    }

    /// Get the uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
