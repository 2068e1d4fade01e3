// libs/intake-cell/src/services/wizard.rs

use chrono::NaiveDate;
use tracing::{debug, info};

use appointment_cell::{BookingConfirmation, BookingRequest, BookingService};
use patient_cell::{PatientIntake, PatientService};
use schedule_cell::{CandidateSlot, ScheduleService, SlotQuery, SlotSearchResponse};
use shared_config::AppConfig;
use shared_models::VisitType;

use crate::models::{
    IntakeDraft, ProviderInput, SessionView, StepInput, WizardBookRequest, WizardError,
    WizardEvent, WizardSession, WizardSlotsResponse, WizardStep, TOTAL_STEPS,
};
use crate::services::greeting::greeting;

/// Drives one intake session through its steps and hands the completed
/// draft to the booking committer.
pub struct WizardService {
    config: AppConfig,
    patients: PatientService,
    schedules: ScheduleService,
    bookings: BookingService,
}

impl WizardService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            config: config.clone(),
            patients: PatientService::new(config),
            schedules: ScheduleService::new(config),
            bookings: BookingService::new(config),
        }
    }

    /// Applies one navigation event. On error the session is unchanged.
    pub fn apply(&self, session: &mut WizardSession, event: WizardEvent) -> Result<(), WizardError> {
        match event {
            WizardEvent::Reset => {
                session.step = WizardStep::FirstName;
                session.draft = IntakeDraft::default();
            }
            WizardEvent::Back => {
                if session.step == WizardStep::Complete {
                    return Err(WizardError::AlreadyComplete);
                }
                session.step = session.step.previous();
            }
            WizardEvent::Next(input) => {
                if session.step == WizardStep::Complete {
                    return Err(WizardError::AlreadyComplete);
                }
                if input.step() != session.step {
                    return Err(WizardError::WrongStep {
                        expected: session.step,
                        got: input.step(),
                    });
                }
                self.record(&mut session.draft, input)?;
                session.step = session.step.next();
            }
        }

        debug!("Session {} now at {:?}", session.session_id, session.step);
        Ok(())
    }

    fn record(&self, draft: &mut IntakeDraft, input: StepInput) -> Result<(), WizardError> {
        match input {
            StepInput::FirstName(name) => {
                draft.first_name = Some(required(&name.value, "Please enter first name")?);
            }
            StepInput::LastName(name) => {
                draft.last_name = Some(required(&name.value, "Please enter last name")?);
            }
            StepInput::DateOfBirth(input) => {
                if !self.config.is_within_calendar(input.dob) {
                    return Err(WizardError::ValidationError(format!(
                        "Date of birth {} must be between {} and {}",
                        input.dob, self.config.calendar_min_date, self.config.calendar_max_date
                    )));
                }
                draft.dob = Some(input.dob);
            }
            StepInput::Contact(contact) => {
                if contact.email.trim().is_empty() || contact.phone.trim().is_empty() {
                    return Err(WizardError::ValidationError(
                        "Please enter contact details".to_string(),
                    ));
                }
                draft.contact = Some(contact);
            }
            StepInput::Insurance(insurance) => {
                draft.insurance = Some(insurance);
            }
            StepInput::Provider(provider) => {
                if provider.doctor.trim().is_empty() || provider.location.trim().is_empty() {
                    return Err(WizardError::ValidationError(
                        "Please choose a doctor and a location".to_string(),
                    ));
                }
                draft.provider = Some(provider);
            }
        }
        Ok(())
    }

    /// Returning when the patient table already holds the drafted name and
    /// date of birth; new otherwise, including while they are incomplete.
    pub fn visit_type(&self, session: &WizardSession) -> Result<VisitType, WizardError> {
        let draft = &session.draft;
        let (Some(first), Some(last), Some(dob)) = (&draft.first_name, &draft.last_name, draft.dob)
        else {
            return Ok(VisitType::New);
        };

        let existing = self.patients.find_patient(first, last, dob)?;
        Ok(VisitType::from_returning(existing.is_some()))
    }

    pub fn visit_minutes(&self, session: &WizardSession) -> Result<i64, WizardError> {
        Ok(self.config.visit_minutes(self.visit_type(session)?.is_returning()))
    }

    /// Candidate slots for the drafted provider on `date`.
    pub fn slots(&self, session: &WizardSession, date: NaiveDate) -> Result<WizardSlotsResponse, WizardError> {
        let provider = self.scheduling_provider(session)?;
        self.check_appointment_date(date)?;

        let visit_type = self.visit_type(session)?;
        let duration = self.config.visit_minutes(visit_type.is_returning());
        let outcome = self
            .schedules
            .search_slots(&provider.doctor, &provider.location, date, duration)?;

        let query = SlotQuery {
            doctor: provider.doctor.clone(),
            location: provider.location.clone(),
            date,
            visit_type: Some(visit_type),
            duration_minutes: Some(duration),
        };
        let search = SlotSearchResponse::new(&query, duration, outcome);

        Ok(WizardSlotsResponse {
            doctor: search.doctor,
            location: search.location,
            date,
            visit_type,
            duration_minutes: duration,
            outcome: search.outcome,
            slots: search.slots,
        })
    }

    /// Commits the chosen slot and completes the session.
    pub fn book(
        &self,
        session: &mut WizardSession,
        choice: WizardBookRequest,
    ) -> Result<BookingConfirmation, WizardError> {
        let provider = self.scheduling_provider(session)?;
        self.check_appointment_date(choice.date)?;

        let duration = self.visit_minutes(session)?;
        let offered = self
            .schedules
            .search_slots(&provider.doctor, &provider.location, choice.date, duration)?;
        let chosen = CandidateSlot {
            start: choice.slot_start,
            end: choice.slot_end,
        };
        if !offered.slots().contains(&chosen) {
            return Err(WizardError::SlotUnavailable {
                start: choice.slot_start,
                end: choice.slot_end,
            });
        }

        let request = booking_request(&session.draft, &choice)?;
        let confirmation = self.bookings.commit(request)?;

        session.draft.appointment_id = Some(confirmation.appointment.appointment_id.clone());
        session.step = WizardStep::Complete;

        info!(
            "Intake session {} completed with appointment {}",
            session.session_id, confirmation.appointment.appointment_id
        );
        Ok(confirmation)
    }

    fn scheduling_provider<'a>(&self, session: &'a WizardSession) -> Result<&'a ProviderInput, WizardError> {
        if session.step != WizardStep::Schedule {
            return Err(WizardError::NotSchedulingStep(session.step));
        }
        session
            .draft
            .provider
            .as_ref()
            .ok_or_else(|| WizardError::ValidationError("No doctor and location chosen".to_string()))
    }

    fn check_appointment_date(&self, date: NaiveDate) -> Result<(), WizardError> {
        if self.config.is_within_calendar(date) {
            Ok(())
        } else {
            Err(WizardError::ValidationError(format!(
                "Appointment date {} is outside the bookable calendar",
                date
            )))
        }
    }
}

/// Booking request for the completed draft.
pub fn booking_request(
    draft: &IntakeDraft,
    choice: &WizardBookRequest,
) -> Result<BookingRequest, WizardError> {
    let provider = draft
        .provider
        .clone()
        .ok_or_else(|| WizardError::ValidationError("No doctor and location chosen".to_string()))?;
    let contact = draft.contact.clone().unwrap_or_default();
    let insurance = draft.insurance.clone().unwrap_or_default();

    Ok(BookingRequest {
        patient: PatientIntake {
            first_name: draft.first_name.clone().unwrap_or_default(),
            last_name: draft.last_name.clone().unwrap_or_default(),
            dob: draft.dob,
            email: contact.email,
            phone: contact.phone,
            city: contact.city,
            state: contact.state,
            zip: contact.zip,
            insurance_carrier: insurance.carrier,
            member_id: insurance.member_id,
            group_number: insurance.group_number,
        },
        doctor: provider.doctor,
        location: provider.location,
        date: choice.date,
        slot_start: choice.slot_start,
        slot_end: choice.slot_end,
    })
}

pub fn session_view(session: &WizardSession, hour: u32) -> SessionView {
    SessionView {
        session_id: session.session_id,
        step: session.step,
        step_number: session.step.number().min(TOTAL_STEPS),
        total_steps: TOTAL_STEPS,
        progress: session.step.progress(),
        prompt: session.step.prompt(),
        greeting: greeting(hour, session.draft.first_name.as_deref()),
        draft: session.draft.clone(),
    }
}

fn required(value: &str, message: &str) -> Result<String, WizardError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(WizardError::ValidationError(message.to_string()))
    } else {
        Ok(trimmed.to_string())
    }
}
