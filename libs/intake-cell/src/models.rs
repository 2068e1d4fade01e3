// libs/intake-cell/src/models.rs
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use appointment_cell::{BookingConfirmation, BookingError};
use patient_cell::PatientError;
use schedule_cell::{CandidateSlotView, ScheduleError};
use shared_models::error::AppError;
use shared_models::VisitType;

// ==============================================================================
// WIZARD STEPS
// ==============================================================================

/// Number of input steps shown to the visitor as "Step n of 7".
pub const TOTAL_STEPS: u8 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    FirstName,
    LastName,
    DateOfBirth,
    Contact,
    Insurance,
    Provider,
    Schedule,
    Complete,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::FirstName => 1,
            WizardStep::LastName => 2,
            WizardStep::DateOfBirth => 3,
            WizardStep::Contact => 4,
            WizardStep::Insurance => 5,
            WizardStep::Provider => 6,
            WizardStep::Schedule => 7,
            WizardStep::Complete => 8,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            WizardStep::FirstName => WizardStep::LastName,
            WizardStep::LastName => WizardStep::DateOfBirth,
            WizardStep::DateOfBirth => WizardStep::Contact,
            WizardStep::Contact => WizardStep::Insurance,
            WizardStep::Insurance => WizardStep::Provider,
            WizardStep::Provider => WizardStep::Schedule,
            WizardStep::Schedule | WizardStep::Complete => WizardStep::Complete,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            WizardStep::FirstName | WizardStep::LastName => WizardStep::FirstName,
            WizardStep::DateOfBirth => WizardStep::LastName,
            WizardStep::Contact => WizardStep::DateOfBirth,
            WizardStep::Insurance => WizardStep::Contact,
            WizardStep::Provider => WizardStep::Insurance,
            WizardStep::Schedule => WizardStep::Provider,
            WizardStep::Complete => WizardStep::Complete,
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            WizardStep::FirstName => "What is your first name?",
            WizardStep::LastName => "What is your last name?",
            WizardStep::DateOfBirth => "Date of birth",
            WizardStep::Contact => "Contact details",
            WizardStep::Insurance => "Insurance (optional)",
            WizardStep::Provider => "Preferred doctor and location",
            WizardStep::Schedule => "Pick a date and slot",
            WizardStep::Complete => "Your appointment is booked",
        }
    }

    pub fn progress(&self) -> String {
        format!("Step {} of {}", self.number().min(TOTAL_STEPS), TOTAL_STEPS)
    }
}

// ==============================================================================
// STEP INPUTS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameInput {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateOfBirthInput {
    pub dob: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInput {
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsuranceInput {
    #[serde(default)]
    pub carrier: String,
    #[serde(default)]
    pub member_id: String,
    #[serde(default)]
    pub group_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderInput {
    pub doctor: String,
    pub location: String,
}

/// Payload of a `Next` event, tagged with the step it answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepInput {
    FirstName(NameInput),
    LastName(NameInput),
    DateOfBirth(DateOfBirthInput),
    Contact(ContactInput),
    Insurance(InsuranceInput),
    Provider(ProviderInput),
}

impl StepInput {
    pub fn step(&self) -> WizardStep {
        match self {
            StepInput::FirstName(_) => WizardStep::FirstName,
            StepInput::LastName(_) => WizardStep::LastName,
            StepInput::DateOfBirth(_) => WizardStep::DateOfBirth,
            StepInput::Contact(_) => WizardStep::Contact,
            StepInput::Insurance(_) => WizardStep::Insurance,
            StepInput::Provider(_) => WizardStep::Provider,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    Next(StepInput),
    Back,
    Reset,
}

// ==============================================================================
// SESSION
// ==============================================================================

/// Everything entered so far. Going back keeps it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntakeDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub contact: Option<ContactInput>,
    pub insurance: Option<InsuranceInput>,
    pub provider: Option<ProviderInput>,
    pub appointment_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WizardSession {
    pub session_id: Uuid,
    pub step: WizardStep,
    pub draft: IntakeDraft,
    pub created_at: NaiveDateTime,
}

impl WizardSession {
    pub fn new(created_at: NaiveDateTime) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            step: WizardStep::FirstName,
            draft: IntakeDraft::default(),
            created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Greeting {
    pub headline: String,
    pub subtitle: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub step: WizardStep,
    pub step_number: u8,
    pub total_steps: u8,
    pub progress: String,
    pub prompt: &'static str,
    pub greeting: Greeting,
    pub draft: IntakeDraft,
}

// ==============================================================================
// REQUEST / RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SlotDateQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct WizardSlotsResponse {
    pub doctor: String,
    pub location: String,
    pub date: NaiveDate,
    pub visit_type: VisitType,
    pub duration_minutes: i64,
    pub outcome: &'static str,
    pub slots: Vec<CandidateSlotView>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WizardBookRequest {
    pub date: NaiveDate,
    pub slot_start: NaiveDateTime,
    pub slot_end: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct WizardBookResponse {
    pub session: SessionView,
    pub confirmation: BookingConfirmation,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Input for {got:?} does not answer the current step {expected:?}")]
    WrongStep { expected: WizardStep, got: WizardStep },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Intake is already complete")]
    AlreadyComplete,

    #[error("Slots can only be chosen on the schedule step, current step is {0:?}")]
    NotSchedulingStep(WizardStep),

    #[error("Slot {start} - {end} is not one of the offered slots")]
    SlotUnavailable {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Patient(#[from] PatientError),

    #[error(transparent)]
    Booking(#[from] BookingError),
}

impl From<WizardError> for AppError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::SessionNotFound(id) => AppError::NotFound(format!("Session not found: {}", id)),
            WizardError::WrongStep { .. } | WizardError::ValidationError(_) => {
                AppError::ValidationError(err.to_string())
            }
            WizardError::AlreadyComplete
            | WizardError::NotSchedulingStep(_)
            | WizardError::SlotUnavailable { .. } => {
                AppError::Conflict(err.to_string())
            }
            WizardError::Schedule(e) => e.into(),
            WizardError::Patient(e) => e.into(),
            WizardError::Booking(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_navigation_order() {
        let mut step = WizardStep::FirstName;
        let mut seen = vec![step.number()];
        while step != WizardStep::Complete {
            step = step.next();
            seen.push(step.number());
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(WizardStep::FirstName.previous(), WizardStep::FirstName);
        assert_eq!(WizardStep::Schedule.previous(), WizardStep::Provider);
    }

    #[test]
    fn test_progress_label_caps_at_total() {
        assert_eq!(WizardStep::Contact.progress(), "Step 4 of 7");
        assert_eq!(WizardStep::Complete.progress(), "Step 7 of 7");
    }

    #[test]
    fn test_step_input_is_tagged() {
        let input: StepInput = serde_json::from_value(serde_json::json!({
            "step": "provider",
            "doctor": "Dr. A",
            "location": "Clinic M"
        }))
        .unwrap();
        assert_eq!(input.step(), WizardStep::Provider);

        let insurance: StepInput =
            serde_json::from_value(serde_json::json!({ "step": "insurance" })).unwrap();
        assert_eq!(insurance, StepInput::Insurance(InsuranceInput::default()));
    }
}
