//! HTTP route handlers for the API.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thoughts_common::{Category, CategoryStats, Note, ThoughtsError};
use tracing::{debug, error, info};

use crate::AppState;
use crate::format;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub inference_enabled: bool,
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime_seconds(),
        inference_enabled: state.service.remote_enabled(),
    })
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

/// An [`ErrorResponse`] paired with its status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: error.into(),
                code,
            },
        }
    }

    fn validation(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", error)
    }
}

impl From<ThoughtsError> for ApiError {
    fn from(e: ThoughtsError) -> Self {
        match e {
            ThoughtsError::Validation(msg) => Self::validation(msg),
            ThoughtsError::Config(msg) => {
                Self::new(StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE", msg)
            }
            other => {
                error!(error = %other, "Request failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PROCESSING_FAILED",
                    format::PROCESSING_FAILED,
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn require_user(user_id: &str) -> Result<(), ApiError> {
    if user_id.trim().is_empty() {
        return Err(ApiError::validation("user_id must not be empty"));
    }
    Ok(())
}

/// Saved-note response body.
#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub note: Note,
    pub message: String,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        let message = format::saved(&note);
        Self { note, message }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub user_id: String,
    pub text: String,
}

/// Process and store a text note.
pub async fn submit_note(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<NoteResponse>), ApiError> {
    require_user(&request.user_id)?;
    info!(
        user_id = %request.user_id,
        content_preview = %request.text.chars().take(50).collect::<String>(),
        "Received note"
    );

    let note = state
        .service
        .submit(&request.text, &request.user_id)
        .await
        .map_err(|e| match e {
            ThoughtsError::Validation(_) => ApiError::validation(format::TOO_SHORT),
            other => ApiError::from(other),
        })?;

    Ok((StatusCode::CREATED, Json(note.into())))
}

#[derive(Debug, Deserialize)]
pub struct VoiceRequest {
    pub user_id: String,
    pub audio_url: String,
}

/// Transcribe, process and store a voice note.
pub async fn submit_voice(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VoiceRequest>,
) -> Result<(StatusCode, Json<NoteResponse>), ApiError> {
    require_user(&request.user_id)?;
    info!(user_id = %request.user_id, "Received voice note");

    let note = state
        .service
        .submit_voice(&request.audio_url, &request.user_id)
        .await
        .map_err(|e| match e {
            ThoughtsError::Validation(_) => ApiError::validation(format::TOO_SHORT),
            other => ApiError::from(other),
        })?;

    match note {
        Some(note) => Ok((StatusCode::CREATED, Json(note.into()))),
        None => Err(ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "TRANSCRIPTION_EMPTY",
            format::TRANSCRIPTION_EMPTY,
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub user_id: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub notes: Vec<Note>,
    pub message: String,
}

/// List a user's newest notes, optionally for one category.
pub async fn list_notes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    require_user(&query.user_id)?;
    let category = query
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(|c| c.trim().parse::<Category>())
        .transpose()?;

    debug!(user_id = %query.user_id, ?category, limit = ?query.limit, "Listing notes");

    let notes = state
        .service
        .list_recent(&query.user_id, category, query.limit)
        .await?;
    let message = format::note_list(&notes, category);

    Ok(Json(ListResponse { notes, message }))
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CategoryStats,
    pub message: String,
}

/// Per-category counts for a user.
pub async fn stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsResponse>, ApiError> {
    require_user(&query.user_id)?;
    let stats = state.service.stats(&query.user_id).await?;
    let message = format::stats(&stats);
    Ok(Json(StatsResponse { stats, message }))
}

#[derive(Debug, Serialize)]
pub struct HelpResponse {
    pub message: String,
}

pub async fn help() -> Json<HelpResponse> {
    Json(HelpResponse {
        message: format::help(),
    })
}
