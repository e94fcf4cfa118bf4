use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::engine::EngineError;
use crate::models::{
    AudioFormat, CategoryFilter, Donor, HistoryEntry, Mantra, PlaybackInput, SessionSnapshot,
    StartSessionInput,
};

use super::AppState;

// ============================================================
// Error Handling
// ============================================================

/// Map an engine failure to a response. Every variant is a caller error with
/// a safe message, so the text goes to the client as-is.
fn engine_error(e: EngineError) -> (StatusCode, String) {
    let status = match e {
        EngineError::InvalidMantra(_) | EngineError::NoSession => StatusCode::NOT_FOUND,
        EngineError::NotCompleted | EngineError::ValidationError { .. } => StatusCode::BAD_REQUEST,
        EngineError::InvalidResource(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
    };
    tracing::warn!("request rejected: {}", e);
    (status, e.to_string())
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Catalog
// ============================================================

/// Query parameters for browsing the catalog.
#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    /// Category name or the `"all"` sentinel. Defaults to `"all"`.
    pub category: Option<String>,
    /// Search term matched against name, text and description.
    pub q: Option<String>,
}

pub async fn list_mantras(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<Vec<Mantra>>, (StatusCode, String)> {
    let category = query.category.as_deref().unwrap_or("all");
    let filter = CategoryFilter::from_str(category).ok_or((
        StatusCode::BAD_REQUEST,
        format!("unknown category: {}", category),
    ))?;

    let term = query.q.as_deref().unwrap_or("");
    let mantras = state
        .catalog
        .browse(filter, term)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(mantras))
}

pub async fn get_mantra(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Mantra>, (StatusCode, String)> {
    state
        .catalog
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, format!("mantra not found: {}", id)))
}

// ============================================================
// Session
// ============================================================

pub async fn start_session(
    State(state): State<AppState>,
    Json(input): Json<StartSessionInput>,
) -> Result<(StatusCode, Json<SessionSnapshot>), (StatusCode, String)> {
    // Resource validation happens here, before the engine is touched: an
    // unsupported upload never affects session state.
    if let Some(mime) = input.custom_audio.as_ref().and_then(|a| a.mime_type()) {
        if AudioFormat::from_mime(mime).is_none() {
            return Err(engine_error(EngineError::InvalidResource(mime.to_string())));
        }
    }

    state
        .engine
        .start(&input.mantra_id, input.custom_audio)
        .map(|s| (StatusCode::CREATED, Json(s)))
        .map_err(engine_error)
}

pub async fn get_session(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, (StatusCode, String)> {
    state
        .engine
        .snapshot()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "no active session".to_string()))
}

pub async fn increment_count(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, (StatusCode, String)> {
    state.engine.increment().map(Json).map_err(engine_error)
}

pub async fn set_playback(
    State(state): State<AppState>,
    Json(input): Json<PlaybackInput>,
) -> Result<Json<SessionSnapshot>, (StatusCode, String)> {
    state
        .engine
        .set_playback(input.command)
        .map(Json)
        .map_err(engine_error)
}

pub async fn audio_ended(State(state): State<AppState>) -> StatusCode {
    state.engine.audio_ended();
    StatusCode::NO_CONTENT
}

pub async fn submit_session(
    State(state): State<AppState>,
    Json(donor): Json<Donor>,
) -> Result<(StatusCode, Json<HistoryEntry>), (StatusCode, String)> {
    state
        .engine
        .submit(donor)
        .map(|e| (StatusCode::CREATED, Json(e)))
        .map_err(engine_error)
}

pub async fn cancel_session(State(state): State<AppState>) -> StatusCode {
    state.engine.cancel();
    StatusCode::NO_CONTENT
}

// ============================================================
// History
// ============================================================

pub async fn list_history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.history.all())
}

pub async fn clear_history(State(state): State<AppState>) -> StatusCode {
    state.history.clear();
    StatusCode::NO_CONTENT
}
