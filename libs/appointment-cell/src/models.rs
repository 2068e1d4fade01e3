// libs/appointment-cell/src/models.rs
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use patient_cell::{Patient, PatientError, PatientIntake};
use schedule_cell::ScheduleError;
use shared_database::codec;
use shared_database::{RecordView, StoreError, TableKind, TableRow};
use shared_models::error::AppError;
use shared_models::VisitType;

// ==============================================================================
// STATUS TYPES
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Display label for the status badge.
    pub fn badge(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "cancelled" | "canceled" => Ok(AppointmentStatus::Cancelled),
            other => Err(format!("unknown appointment status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderState {
    #[default]
    Pending,
    Sent,
}

impl ReminderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderState::Pending => "pending",
            ReminderState::Sent => "sent",
        }
    }

    /// Anything other than `sent` reads as pending.
    pub fn parse_lenient(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("sent") {
            ReminderState::Sent
        } else {
            ReminderState::Pending
        }
    }
}

// ==============================================================================
// APPOINTMENT TABLE ROW
// ==============================================================================

/// One booked visit with a snapshot of the patient's contact and insurance
/// details as they were at booking time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub appointment_id: String,
    pub created_at: Option<NaiveDateTime>,
    pub patient_id: String,
    pub patient_name: String,
    pub dob: Option<NaiveDate>,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub doctor: String,
    pub location: String,
    pub visit_type: Option<VisitType>,
    pub appointment_date: Option<NaiveDate>,
    pub slot_start: Option<NaiveDateTime>,
    pub slot_end: Option<NaiveDateTime>,
    pub insurance_carrier: String,
    pub member_id: String,
    pub group_number: String,
    /// Stored verbatim so unrecognised values survive a rewrite.
    pub status: String,
    pub forms_sent: bool,
    pub reminder_1: ReminderState,
    pub reminder_2: ReminderState,
    pub reminder_3: ReminderState,
    pub cancellation_reason: String,
}

impl Appointment {
    pub fn status(&self) -> Option<AppointmentStatus> {
        self.status.parse().ok()
    }

    /// Badge label. Any status other than scheduled or confirmed shows as
    /// cancelled.
    pub fn badge(&self) -> &'static str {
        match self.status() {
            Some(status) => status.badge(),
            None => AppointmentStatus::Cancelled.badge(),
        }
    }

    pub fn reminders(&self) -> [ReminderState; 3] {
        [self.reminder_1, self.reminder_2, self.reminder_3]
    }
}

impl TableRow for Appointment {
    const KIND: TableKind = TableKind::Appointments;

    fn from_record(record: &RecordView<'_>) -> Self {
        Self {
            appointment_id: record.text("appointment_id"),
            created_at: record.timestamp("created_at"),
            patient_id: record.text("patient_id"),
            patient_name: record.text("patient_name"),
            dob: record.date("dob"),
            email: record.text("email"),
            phone: record.text("phone"),
            city: record.text("city"),
            state: record.text("state"),
            zip: record.text("zip"),
            doctor: record.text("doctor"),
            location: record.text("location"),
            visit_type: record.raw("visit_type").parse().ok(),
            appointment_date: record.date("appointment_date"),
            slot_start: record.timestamp("slot_start"),
            slot_end: record.timestamp("slot_end"),
            insurance_carrier: record.text("insurance_carrier"),
            member_id: record.text("member_id"),
            group_number: record.text("group_number"),
            status: record.text("status"),
            forms_sent: record.flag("forms_sent"),
            reminder_1: ReminderState::parse_lenient(record.raw("reminder_1")),
            reminder_2: ReminderState::parse_lenient(record.raw("reminder_2")),
            reminder_3: ReminderState::parse_lenient(record.raw("reminder_3")),
            cancellation_reason: record.text("cancellation_reason"),
        }
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.appointment_id.clone(),
            codec::format_timestamp(self.created_at),
            self.patient_id.clone(),
            self.patient_name.clone(),
            codec::format_date(self.dob),
            self.email.clone(),
            self.phone.clone(),
            self.city.clone(),
            self.state.clone(),
            self.zip.clone(),
            self.doctor.clone(),
            self.location.clone(),
            self.visit_type.map(|v| v.as_str().to_string()).unwrap_or_default(),
            codec::format_date(self.appointment_date),
            codec::format_timestamp(self.slot_start),
            codec::format_timestamp(self.slot_end),
            self.insurance_carrier.clone(),
            self.member_id.clone(),
            self.group_number.clone(),
            self.status.clone(),
            codec::format_bool(self.forms_sent),
            self.reminder_1.as_str().to_string(),
            self.reminder_2.as_str().to_string(),
            self.reminder_3.as_str().to_string(),
            self.cancellation_reason.clone(),
        ]
    }
}

// ==============================================================================
// REQUEST / RESPONSE MODELS
// ==============================================================================

/// A chosen slot plus the intake needed to resolve the patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub patient: PatientIntake,
    pub doctor: String,
    pub location: String,
    pub date: NaiveDate,
    pub slot_start: NaiveDateTime,
    pub slot_end: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub appointment: Appointment,
    pub patient: Patient,
    pub patient_created: bool,
    pub rows_marked: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderPreview {
    pub appointment_id: String,
    pub badge: &'static str,
    pub sms: String,
    pub email: String,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Appointment not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Patient(#[from] PatientError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::ValidationError(msg) => AppError::ValidationError(msg),
            BookingError::NotFound(msg) => AppError::NotFound(msg),
            BookingError::Schedule(e) => e.into(),
            BookingError::Patient(e) => e.into(),
            BookingError::Store(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing_and_badges() {
        assert_eq!("Scheduled".parse(), Ok(AppointmentStatus::Scheduled));
        assert_eq!(" canceled".parse(), Ok(AppointmentStatus::Cancelled));
        assert!("no_show".parse::<AppointmentStatus>().is_err());
        assert_eq!(AppointmentStatus::Confirmed.badge(), "Confirmed");
    }

    #[test]
    fn test_reminder_state_lenient() {
        assert_eq!(ReminderState::parse_lenient("SENT"), ReminderState::Sent);
        assert_eq!(ReminderState::parse_lenient(""), ReminderState::Pending);
        assert_eq!(ReminderState::parse_lenient("queued"), ReminderState::Pending);
    }

    #[test]
    fn test_booking_error_maps_to_app_error() {
        let err: AppError = BookingError::NotFound("a-1".to_string()).into();
        assert!(matches!(err, AppError::NotFound(_)));

        let err: AppError = BookingError::Schedule(ScheduleError::InvalidDuration(0)).into();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
