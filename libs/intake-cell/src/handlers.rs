// libs/intake-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{Local, Timelike};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::run_blocking;

use crate::models::{
    SessionView, SlotDateQuery, StepInput, WizardBookRequest, WizardBookResponse, WizardEvent,
    WizardSlotsResponse,
};
use crate::services::wizard::session_view;
use crate::services::{SessionStore, WizardService};

fn current_hour() -> u32 {
    Local::now().hour()
}

#[axum::debug_handler]
pub async fn create_session(
    Extension(sessions): Extension<SessionStore>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let session = sessions.create(Local::now().naive_local()).await;
    Ok((StatusCode::CREATED, Json(session_view(&session, current_hour()))))
}

#[axum::debug_handler]
pub async fn get_session(
    Extension(sessions): Extension<SessionStore>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = sessions.get(session_id).await?;
    Ok(Json(session_view(&session, current_hour())))
}

#[axum::debug_handler]
pub async fn next_step(
    State(config): State<Arc<AppConfig>>,
    Extension(sessions): Extension<SessionStore>,
    Path(session_id): Path<Uuid>,
    Json(input): Json<StepInput>,
) -> Result<Json<SessionView>, AppError> {
    apply_event(&config, &sessions, session_id, WizardEvent::Next(input)).await
}

#[axum::debug_handler]
pub async fn previous_step(
    State(config): State<Arc<AppConfig>>,
    Extension(sessions): Extension<SessionStore>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    apply_event(&config, &sessions, session_id, WizardEvent::Back).await
}

#[axum::debug_handler]
pub async fn reset_session(
    State(config): State<Arc<AppConfig>>,
    Extension(sessions): Extension<SessionStore>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    apply_event(&config, &sessions, session_id, WizardEvent::Reset).await
}

async fn apply_event(
    config: &AppConfig,
    sessions: &SessionStore,
    session_id: Uuid,
    event: WizardEvent,
) -> Result<Json<SessionView>, AppError> {
    let mut guard = sessions.lock().await;
    let mut session = guard.get(session_id)?;
    WizardService::new(config).apply(&mut session, event)?;

    let view = session_view(&session, current_hour());
    guard.save(session);
    Ok(Json(view))
}

#[axum::debug_handler]
pub async fn get_session_slots(
    State(config): State<Arc<AppConfig>>,
    Extension(sessions): Extension<SessionStore>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<SlotDateQuery>,
) -> Result<Json<WizardSlotsResponse>, AppError> {
    let session = sessions.get(session_id).await?;
    let response =
        run_blocking(move || WizardService::new(&config).slots(&session, query.date)).await?;

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn book_session_slot(
    State(config): State<Arc<AppConfig>>,
    Extension(sessions): Extension<SessionStore>,
    Path(session_id): Path<Uuid>,
    Json(choice): Json<WizardBookRequest>,
) -> Result<(StatusCode, Json<WizardBookResponse>), AppError> {
    // Held until the completed step is stored; a repeated request then sees
    // `Complete`.
    let mut guard = sessions.lock().await;
    let mut session = guard.get(session_id)?;
    let (session, confirmation) = run_blocking(move || {
        WizardService::new(&config)
            .book(&mut session, choice)
            .map(|confirmation| (session, confirmation))
    })
    .await?;

    let view = session_view(&session, current_hour());
    guard.save(session);

    Ok((
        StatusCode::CREATED,
        Json(WizardBookResponse {
            session: view,
            confirmation,
        }),
    ))
}
