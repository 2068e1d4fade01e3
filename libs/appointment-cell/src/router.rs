// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/",
            post(handlers::book_appointment).get(handlers::list_appointments),
        )
        .route("/latest", get(handlers::get_latest_appointment))
        .route("/export", get(handlers::export_appointments))
        .route("/{appointment_id}/reminders", get(handlers::get_appointment_reminders))
        .with_state(state)
}
