// libs/intake-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use shared_config::AppConfig;

use crate::handlers;
use crate::services::SessionStore;

pub fn intake_routes(state: Arc<AppConfig>) -> Router {
    intake_routes_with_sessions(state, SessionStore::new())
}

pub fn intake_routes_with_sessions(state: Arc<AppConfig>, sessions: SessionStore) -> Router {
    Router::new()
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/{session_id}", get(handlers::get_session))
        .route("/sessions/{session_id}/next", post(handlers::next_step))
        .route("/sessions/{session_id}/back", post(handlers::previous_step))
        .route("/sessions/{session_id}/reset", post(handlers::reset_session))
        .route("/sessions/{session_id}/slots", get(handlers::get_session_slots))
        .route("/sessions/{session_id}/book", post(handlers::book_session_slot))
        .layer(Extension(sessions))
        .with_state(state)
}
