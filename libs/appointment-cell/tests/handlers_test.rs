// libs/appointment-cell/tests/handlers_test.rs

use assert_matches::assert_matches;
use axum::extract::{Path, State};

use appointment_cell::handlers::*;
use appointment_cell::models::*;
use appointment_cell::services::AppointmentService;
use shared_models::error::AppError;
use shared_utils::test_utils::{date, time, ScheduleFixture, TestConfig, TestIntake};

fn booking(start: &str, end: &str) -> BookingRequest {
    serde_json::from_value(TestIntake::booking_body(
        "Sam",
        "Lee",
        "1970-02-03",
        "Dr. B",
        "Annex",
        "2024-06-10",
        start,
        end,
    ))
    .unwrap()
}

#[tokio::test]
async fn test_book_appointment_handler() {
    let config = TestConfig::default();
    config.write_schedules(
        &ScheduleFixture::new()
            .run("Dr. B", "Annex", date("2024-06-10"), time("13:00"), 15, 4, true)
            .to_csv(),
    );

    let (status, confirmation) = book_appointment(
        State(config.to_arc()),
        axum::Json(booking("2024-06-10T13:00:00", "2024-06-10T13:30:00")),
    )
    .await
    .unwrap();

    assert_eq!(status, axum::http::StatusCode::CREATED);
    assert_eq!(confirmation.rows_marked, 2);
    assert_eq!(confirmation.appointment.patient_name, "Sam Lee");
    assert_eq!(confirmation.appointment.insurance_carrier, "Acme Health");
    assert_eq!(confirmation.appointment.status(), Some(AppointmentStatus::Scheduled));

    let stored = AppointmentService::new(&config.to_app_config())
        .get(&confirmation.appointment.appointment_id)
        .unwrap();
    assert_eq!(stored, confirmation.appointment);
}

#[tokio::test]
async fn test_reminders_handler_not_found() {
    let config = TestConfig::default();
    let result = get_appointment_reminders(State(config.to_arc()), Path("nope".to_string())).await;
    assert_matches!(result, Err(AppError::NotFound(_)));
}

#[tokio::test]
async fn test_export_handler_without_file() {
    let config = TestConfig::default();
    let result = export_appointments(State(config.to_arc())).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_unknown_status_survives_rewrite() {
    let config = TestConfig::default();
    let app_config = config.to_app_config();
    std::fs::write(
        app_config.appointments_path(),
        "appointment_id,created_at,patient_id,patient_name,status\nA-1,,P-1,Old Row,no_show\n",
    )
    .unwrap();
    config.write_schedules(
        &ScheduleFixture::new()
            .run("Dr. B", "Annex", date("2024-06-10"), time("13:00"), 30, 1, true)
            .to_csv(),
    );

    book_appointment(
        State(config.to_arc()),
        axum::Json(booking("2024-06-10T13:00:00", "2024-06-10T13:30:00")),
    )
    .await
    .unwrap();

    let appointments = AppointmentService::new(&app_config).list().unwrap();
    assert_eq!(appointments.len(), 2);
    assert_eq!(appointments[0].status, "no_show");
    assert_eq!(appointments[0].badge(), "Cancelled");
    assert_eq!(appointments[0].reminders(), [ReminderState::Pending; 3]);
}
