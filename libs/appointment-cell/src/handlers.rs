// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::run_blocking;

use crate::models::{BookingConfirmation, BookingRequest, ReminderPreview};
use crate::services::{AppointmentService, BookingService, ReminderService};

#[axum::debug_handler]
pub async fn book_appointment(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingConfirmation>), AppError> {
    let confirmation = run_blocking(move || BookingService::new(&config).commit(request)).await?;

    Ok((StatusCode::CREATED, Json(confirmation)))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let appointments = run_blocking(move || AppointmentService::new(&config).list()).await?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

/// Most recent booking with its badge and reminder previews.
#[axum::debug_handler]
pub async fn get_latest_appointment(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let latest = run_blocking(move || AppointmentService::new(&config).latest()).await?;

    let appointment =
        latest.ok_or_else(|| AppError::NotFound("No appointments booked yet".to_string()))?;
    let preview = ReminderService::preview(&appointment);

    Ok(Json(json!({
        "appointment": appointment,
        "badge": preview.badge,
        "reminders": {
            "sms": preview.sms,
            "email": preview.email
        }
    })))
}

#[axum::debug_handler]
pub async fn get_appointment_reminders(
    State(config): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
) -> Result<Json<ReminderPreview>, AppError> {
    let preview =
        run_blocking(move || AppointmentService::new(&config).reminders(&appointment_id)).await?;

    Ok(Json(preview))
}

#[axum::debug_handler]
pub async fn export_appointments(
    State(config): State<Arc<AppConfig>>,
) -> Result<Response, AppError> {
    let file_name = config.appointments_file.clone();
    let bytes = run_blocking(move || AppointmentService::new(&config).export()).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response())
}
