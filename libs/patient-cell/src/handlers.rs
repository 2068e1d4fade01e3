// libs/patient-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::run_blocking;

use crate::models::{PatientLookupQuery, PatientLookupResponse};
use crate::services::PatientService;

/// New/returning classification for a name and date of birth.
#[axum::debug_handler]
pub async fn lookup_patient(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<PatientLookupQuery>,
) -> Result<Json<PatientLookupResponse>, AppError> {
    let response = run_blocking(move || {
        PatientService::new(&config).lookup(&query.first_name, &query.last_name, query.dob)
    })
    .await?;

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn import_patients(
    State(config): State<Arc<AppConfig>>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let imported = run_blocking(move || PatientService::new(&config).import_csv(&body)).await?;

    Ok(Json(json!({
        "table": "patients",
        "imported": imported
    })))
}
