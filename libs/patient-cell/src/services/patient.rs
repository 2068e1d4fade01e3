// libs/patient-cell/src/services/patient.rs

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::FlatFileStore;
use shared_models::VisitType;

use crate::models::{
    Patient, PatientError, PatientIntake, PatientLookupResponse, PatientResolution,
};

pub struct PatientService {
    store: FlatFileStore,
    new_visit_minutes: i64,
    returning_visit_minutes: i64,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: FlatFileStore::new(config),
            new_visit_minutes: config.new_visit_minutes,
            returning_visit_minutes: config.returning_visit_minutes,
        }
    }

    pub fn load_patients(&self) -> Result<Vec<Patient>, PatientError> {
        Ok(self.store.load::<Patient>()?)
    }

    pub fn save_patients(&self, patients: &[Patient]) -> Result<(), PatientError> {
        Ok(self.store.save(patients)?)
    }

    /// First patient matching the name and date of birth, if any.
    pub fn find_patient(
        &self,
        first_name: &str,
        last_name: &str,
        dob: NaiveDate,
    ) -> Result<Option<Patient>, PatientError> {
        let patients = self.load_patients()?;
        Ok(find_in(&patients, first_name, last_name, dob).cloned())
    }

    /// Classifies a visitor as new or returning and picks the visit length.
    pub fn lookup(
        &self,
        first_name: &str,
        last_name: &str,
        dob: NaiveDate,
    ) -> Result<PatientLookupResponse, PatientError> {
        let existing = self.find_patient(first_name, last_name, dob)?;
        let visit_type = VisitType::from_returning(existing.is_some());
        debug!("Lookup for {} {} classified as {}", first_name, last_name, visit_type);

        Ok(PatientLookupResponse {
            matched: existing.is_some(),
            patient_id: existing.map(|p| p.patient_id),
            visit_type,
            visit_minutes: self.visit_minutes(visit_type),
        })
    }

    /// Resolves an intake to an existing patient, or appends a new record
    /// with a fresh id and rewrites the patient file.
    ///
    /// An existing record is returned as stored; intake fields do not
    /// overwrite it.
    pub fn resolve_or_create(&self, intake: &PatientIntake) -> Result<PatientResolution, PatientError> {
        let (first_name, last_name, dob) = intake.identity()?;
        let mut patients = self.load_patients()?;

        if let Some(existing) = find_in(&patients, &first_name, &last_name, dob) {
            debug!("Matched existing patient {}", existing.patient_id);
            return Ok(PatientResolution {
                patient: existing.clone(),
                created: false,
            });
        }

        let patient = intake.clone().into_patient(Uuid::new_v4().to_string());
        patients.push(patient.clone());
        self.save_patients(&patients)?;

        info!("Registered new patient {} ({})", patient.patient_id, patient.full_name());
        Ok(PatientResolution {
            patient,
            created: true,
        })
    }

    pub fn import_csv(&self, body: &[u8]) -> Result<usize, PatientError> {
        Ok(self.store.import::<Patient>(body)?)
    }

    fn visit_minutes(&self, visit_type: VisitType) -> i64 {
        match visit_type {
            VisitType::New => self.new_visit_minutes,
            VisitType::Returning => self.returning_visit_minutes,
        }
    }
}

fn find_in<'a>(
    patients: &'a [Patient],
    first_name: &str,
    last_name: &str,
    dob: NaiveDate,
) -> Option<&'a Patient> {
    patients
        .iter()
        .find(|patient| patient.matches(first_name, last_name, dob))
}
