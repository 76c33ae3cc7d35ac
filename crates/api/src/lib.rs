//! HTTP adapter for the note pipeline.
//!
//! Stands in for the chat transport: it hands inbound text (or an audio
//! reference for voice notes) to [`thoughts_pipeline::NoteService`] and renders
//! the results into user-facing messages.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /api/v1/notes` - Submit a text note
//! - `POST /api/v1/notes/voice` - Submit a voice note by audio URL
//! - `GET /api/v1/notes` - List recent notes, optionally by category
//! - `GET /api/v1/stats` - Per-category counts
//! - `GET /api/v1/help` - Usage text
//!
//! # Architecture
//!
//! ```text
//! Client (chat bot, curl, ...)
//!    │
//!    ▼
//! ┌─────────────────┐
//! │   API Adapter   │ ◄── This crate
//! │     (Axum)      │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌─────────────────┐
//! │   NoteService   │ ──► │    NoteStore    │
//! └─────────────────┘     └─────────────────┘
//! ```

pub mod format;
pub mod routes;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use state::AppState;

/// Create the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health))
        .route(
            "/api/v1/notes",
            post(routes::submit_note).get(routes::list_notes),
        )
        .route("/api/v1/notes/voice", post(routes::submit_voice))
        .route("/api/v1/stats", get(routes::stats))
        .route("/api/v1/help", get(routes::help))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the API server on the given address.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> anyhow::Result<()> {
    let router = create_router(state);

    info!(%addr, "Starting thoughts API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
