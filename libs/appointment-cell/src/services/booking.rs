// libs/appointment-cell/src/services/booking.rs

use chrono::{Local, NaiveDateTime, Timelike};
use tracing::info;
use uuid::Uuid;

use patient_cell::PatientService;
use schedule_cell::ScheduleService;
use shared_config::AppConfig;
use shared_database::FlatFileStore;

use crate::models::{
    Appointment, AppointmentStatus, BookingConfirmation, BookingError, BookingRequest,
    ReminderState,
};

/// Commits a chosen slot: reserves the schedule rows, resolves the patient,
/// then appends the appointment.
///
/// The three tables are rewritten one after another with no atomicity
/// across them. A failure part way leaves the earlier writes in place.
pub struct BookingService {
    config: AppConfig,
    schedules: ScheduleService,
    patients: PatientService,
    store: FlatFileStore,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            config: config.clone(),
            schedules: ScheduleService::new(config),
            patients: PatientService::new(config),
            store: FlatFileStore::new(config),
        }
    }

    pub fn commit(&self, request: BookingRequest) -> Result<BookingConfirmation, BookingError> {
        self.commit_at(request, Local::now().naive_local())
    }

    pub fn commit_at(
        &self,
        request: BookingRequest,
        now: NaiveDateTime,
    ) -> Result<BookingConfirmation, BookingError> {
        self.validate(&request)?;
        // Identity is checked before any table is touched.
        request.patient.identity()?;

        let reservation = self.schedules.reserve(
            &request.doctor,
            &request.location,
            request.date,
            request.slot_start,
            request.slot_end,
        )?;

        let resolution = self.patients.resolve_or_create(&request.patient)?;
        let visit_type = resolution.visit_type();
        let patient = resolution.patient;
        let intake = request.patient;

        let appointment = Appointment {
            appointment_id: Uuid::new_v4().to_string(),
            created_at: Some(now.with_nanosecond(0).unwrap_or(now)),
            patient_id: patient.patient_id.clone(),
            patient_name: patient.full_name(),
            dob: intake.dob,
            email: intake.email,
            phone: intake.phone,
            city: intake.city,
            state: intake.state,
            zip: intake.zip,
            doctor: request.doctor,
            location: request.location,
            visit_type: Some(visit_type),
            appointment_date: Some(request.date),
            slot_start: Some(request.slot_start),
            slot_end: Some(request.slot_end),
            insurance_carrier: intake.insurance_carrier,
            member_id: intake.member_id,
            group_number: intake.group_number,
            status: AppointmentStatus::Scheduled.as_str().to_string(),
            forms_sent: false,
            reminder_1: ReminderState::Pending,
            reminder_2: ReminderState::Pending,
            reminder_3: ReminderState::Pending,
            cancellation_reason: String::new(),
        };

        let mut appointments = self.store.load::<Appointment>()?;
        appointments.push(appointment.clone());
        self.store.save(&appointments)?;

        info!(
            "Booked appointment {} for patient {} with {} at {} ({} visit)",
            appointment.appointment_id, appointment.patient_id, appointment.doctor, appointment.location, visit_type
        );

        Ok(BookingConfirmation {
            appointment,
            patient,
            patient_created: !visit_type.is_returning(),
            rows_marked: reservation.rows_marked,
        })
    }

    fn validate(&self, request: &BookingRequest) -> Result<(), BookingError> {
        if request.doctor.trim().is_empty() {
            return Err(BookingError::ValidationError("doctor is required".to_string()));
        }
        if request.location.trim().is_empty() {
            return Err(BookingError::ValidationError("location is required".to_string()));
        }
        if request.slot_end <= request.slot_start {
            return Err(BookingError::ValidationError(format!(
                "slot end {} must be after slot start {}",
                request.slot_end, request.slot_start
            )));
        }
        if request.slot_start.date() != request.date {
            return Err(BookingError::ValidationError(format!(
                "slot starting {} is not on {}",
                request.slot_start, request.date
            )));
        }
        if !self.config.is_within_calendar(request.date) {
            return Err(BookingError::ValidationError(format!(
                "appointment date {} is outside the bookable calendar",
                request.date
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;
    use patient_cell::PatientIntake;
    use shared_models::VisitType;
    use tempfile::TempDir;

    const SCHEDULE: &str = "\
doctor,location,date,slot_start,slot_end,available
Dr. A,Clinic M,2024-05-01,2024-05-01 09:00:00,2024-05-01 09:30:00,True
Dr. A,Clinic M,2024-05-01,2024-05-01 09:30:00,2024-05-01 10:00:00,True
Dr. A,Clinic M,2024-05-01,2024-05-01 10:00:00,2024-05-01 10:30:00,True
";

    fn setup() -> (TempDir, AppConfig) {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            data_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        std::fs::write(config.schedules_path(), SCHEDULE).unwrap();
        (dir, config)
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        day().and_hms_opt(h, m, 0).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn request(start: NaiveDateTime, end: NaiveDateTime) -> BookingRequest {
        BookingRequest {
            patient: PatientIntake {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                dob: NaiveDate::from_ymd_opt(1985, 7, 4),
                email: "jane@example.com".to_string(),
                insurance_carrier: "Acme Health".to_string(),
                ..PatientIntake::default()
            },
            doctor: "Dr. A".to_string(),
            location: "Clinic M".to_string(),
            date: day(),
            slot_start: start,
            slot_end: end,
        }
    }

    #[test]
    fn test_commit_writes_all_three_tables() {
        let (_dir, config) = setup();
        let service = BookingService::new(&config);
        let now = at(8, 15) + chrono::Duration::milliseconds(250);

        let confirmation = service.commit_at(request(at(9, 0), at(10, 0)), now).unwrap();

        assert_eq!(confirmation.rows_marked, 2);
        assert!(confirmation.patient_created);

        let appointment = &confirmation.appointment;
        assert_eq!(appointment.status, "scheduled");
        assert_eq!(appointment.reminders(), [ReminderState::Pending; 3]);
        assert!(!appointment.forms_sent);
        assert_eq!(appointment.cancellation_reason, "");
        assert_eq!(appointment.visit_type, Some(VisitType::New));
        assert_eq!(appointment.created_at, Some(at(8, 15)));
        assert_eq!(appointment.patient_name, "Jane Doe");
        assert_eq!(appointment.patient_id, confirmation.patient.patient_id);

        let rows = ScheduleService::new(&config).load_schedule().unwrap();
        let flags: Vec<bool> = rows.iter().map(|row| row.available).collect();
        assert_eq!(flags, vec![false, false, true]);

        let stored = FlatFileStore::new(&config).load::<Appointment>().unwrap();
        assert_eq!(stored, vec![confirmation.appointment.clone()]);
    }

    #[test]
    fn test_second_booking_is_returning_visit() {
        let (_dir, config) = setup();
        let service = BookingService::new(&config);

        let first = service.commit_at(request(at(9, 0), at(10, 0)), at(8, 0)).unwrap();
        let mut again = request(at(10, 0), at(10, 30));
        again.patient.first_name = " JANE".to_string();
        let second = service.commit_at(again, at(8, 5)).unwrap();

        assert!(!second.patient_created);
        assert_eq!(second.appointment.visit_type, Some(VisitType::Returning));
        assert_eq!(second.patient.patient_id, first.patient.patient_id);
        assert_eq!(PatientService::new(&config).load_patients().unwrap().len(), 1);
        assert_eq!(FlatFileStore::new(&config).load::<Appointment>().unwrap().len(), 2);
    }

    #[test]
    fn test_returning_patient_name_comes_from_registry() {
        let (_dir, config) = setup();
        std::fs::write(
            config.patients_path(),
            "patient_id,first_name,last_name,dob,is_returning\nP-1,Jane,Doe,1985-07-04,True\n",
        )
        .unwrap();

        let mut shouted = request(at(9, 0), at(10, 0));
        shouted.patient.first_name = " JANE ".to_string();
        shouted.patient.last_name = "doe".to_string();
        let confirmation = BookingService::new(&config).commit_at(shouted, at(8, 0)).unwrap();

        assert!(!confirmation.patient_created);
        assert_eq!(confirmation.appointment.patient_id, "P-1");
        assert_eq!(confirmation.appointment.patient_name, "Jane Doe");
        assert_eq!(confirmation.appointment.email, "jane@example.com");
    }

    #[test]
    fn test_booking_without_matching_rows_still_records() {
        let (_dir, config) = setup();
        let service = BookingService::new(&config);

        let confirmation = service.commit_at(request(at(14, 0), at(15, 0)), at(8, 0)).unwrap();
        assert_eq!(confirmation.rows_marked, 0);
        assert_eq!(FlatFileStore::new(&config).load::<Appointment>().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_requests_touch_nothing() {
        let (dir, config) = setup();
        let service = BookingService::new(&config);

        assert_matches!(
            service.commit_at(request(at(10, 0), at(9, 0)), at(8, 0)),
            Err(BookingError::ValidationError(_))
        );

        let mut nameless = request(at(9, 0), at(10, 0));
        nameless.patient.first_name = String::new();
        assert_matches!(
            service.commit_at(nameless, at(8, 0)),
            Err(BookingError::Patient(_))
        );

        let mut wrong_day = request(at(9, 0), at(10, 0));
        wrong_day.date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        assert_matches!(
            service.commit_at(wrong_day, at(8, 0)),
            Err(BookingError::ValidationError(_))
        );

        assert_eq!(std::fs::read_to_string(config.schedules_path()).unwrap(), SCHEDULE);
        assert!(!dir.path().join("appointments.csv").exists());
        assert!(!dir.path().join("patients.csv").exists());
    }

    #[test]
    fn test_outside_calendar_rejected() {
        let (_dir, mut config) = setup();
        config.calendar_max_date = NaiveDate::from_ymd_opt(2024, 4, 30).unwrap();
        assert_matches!(
            BookingService::new(&config).commit_at(request(at(9, 0), at(10, 0)), at(8, 0)),
            Err(BookingError::ValidationError(_))
        );
    }
}
