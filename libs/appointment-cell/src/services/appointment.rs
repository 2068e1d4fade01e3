// libs/appointment-cell/src/services/appointment.rs

use tracing::debug;

use shared_config::AppConfig;
use shared_database::{FlatFileStore, TableKind};

use crate::models::{Appointment, BookingError, ReminderPreview};
use crate::services::reminders::ReminderService;

/// Read side of the appointment table.
pub struct AppointmentService {
    store: FlatFileStore,
}

impl AppointmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: FlatFileStore::new(config),
        }
    }

    pub fn list(&self) -> Result<Vec<Appointment>, BookingError> {
        Ok(self.store.load::<Appointment>()?)
    }

    /// The most recently appended appointment.
    pub fn latest(&self) -> Result<Option<Appointment>, BookingError> {
        Ok(self.list()?.pop())
    }

    pub fn get(&self, appointment_id: &str) -> Result<Appointment, BookingError> {
        self.list()?
            .into_iter()
            .find(|appointment| appointment.appointment_id == appointment_id)
            .ok_or_else(|| BookingError::NotFound(appointment_id.to_string()))
    }

    pub fn reminders(&self, appointment_id: &str) -> Result<ReminderPreview, BookingError> {
        let appointment = self.get(appointment_id)?;
        debug!("Rendering reminder previews for {}", appointment_id);
        Ok(ReminderService::preview(&appointment))
    }

    /// Raw appointment file for download.
    pub fn export(&self) -> Result<Vec<u8>, BookingError> {
        self.store
            .export(TableKind::Appointments)?
            .ok_or_else(|| BookingError::NotFound("no appointments have been recorded".to_string()))
    }
}
