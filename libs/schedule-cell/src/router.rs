use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn schedule_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/doctors", get(handlers::list_doctors))
        .route("/locations", get(handlers::list_locations))
        .route("/slots", get(handlers::get_available_slots))
        .route("/import", put(handlers::import_schedule))
        .with_state(state)
}
