// libs/schedule-cell/src/handlers.rs
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

use crate::models::{SlotQuery, SlotSearchResponse};
use crate::services::ScheduleService;

#[axum::debug_handler]
pub async fn list_doctors(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let doctors = run_blocking(move || ScheduleService::new(&config).doctors()).await?;

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn list_locations(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let locations = run_blocking(move || ScheduleService::new(&config).locations()).await?;

    Ok(Json(json!({
        "locations": locations,
        "total": locations.len()
    })))
}

/// Candidate slots for a doctor/location/date. An explicit
/// `duration_minutes` wins over `visit_type`; with neither, the new-patient
/// duration applies.
#[axum::debug_handler]
pub async fn get_available_slots(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<SlotSearchResponse>, AppError> {
    let duration = query.duration_minutes.unwrap_or_else(|| {
        config.visit_minutes(query.visit_type.map(|v| v.is_returning()).unwrap_or(false))
    });

    let search = query.clone();
    let outcome = run_blocking(move || {
        ScheduleService::new(&config).search_slots(
            &search.doctor,
            &search.location,
            search.date,
            duration,
        )
    })
    .await?;

    Ok(Json(SlotSearchResponse::new(&query, duration, outcome)))
}

#[axum::debug_handler]
pub async fn import_schedule(
    State(config): State<Arc<AppConfig>>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let imported =
        run_blocking(move || ScheduleService::new(&config).import_csv(&body)).await?;

    Ok(Json(json!({
        "table": "schedules",
        "imported": imported
    })))
}
