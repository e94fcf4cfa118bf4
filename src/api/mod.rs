mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::catalog::MantraCatalog;
use crate::engine::SessionEngine;
use crate::history::HistoryStore;
use middleware::AdminGate;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<MantraCatalog>,
    pub engine: SessionEngine,
    pub history: HistoryStore,
}

impl AppState {
    pub fn new() -> Self {
        let catalog = Arc::new(MantraCatalog::seeded());
        let history = HistoryStore::new();
        let engine = SessionEngine::new(catalog.clone(), history.clone());
        Self {
            catalog,
            engine,
            history,
        }
    }

}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn create_router(state: AppState, gate: AdminGate) -> Router {
    let destructive = Router::new()
        .route("/history", delete(handlers::clear_history))
        .route_layer(axum::middleware::from_fn_with_state(
            gate,
            middleware::admin_gate_middleware,
        ));

    let api = Router::new()
        // Catalog
        .route("/mantras", get(handlers::list_mantras))
        .route("/mantras/{id}", get(handlers::get_mantra))
        // Session
        .route("/session", post(handlers::start_session))
        .route("/session", get(handlers::get_session))
        .route("/session", delete(handlers::cancel_session))
        .route("/session/count", post(handlers::increment_count))
        .route("/session/playback", post(handlers::set_playback))
        .route("/session/ended", post(handlers::audio_ended))
        .route("/session/submit", post(handlers::submit_session))
        // History
        .route("/history", get(handlers::list_history))
        .merge(destructive)
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
