use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn patient_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/lookup", get(handlers::lookup_patient))
        .route("/import", put(handlers::import_patients))
        .with_state(state)
}
