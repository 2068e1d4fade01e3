use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shared_database::codec;
use shared_database::{RecordView, StoreError, TableKind, TableRow};
use shared_models::error::AppError;
use shared_models::VisitType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<NaiveDate>,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub insurance_carrier: String,
    pub member_id: String,
    pub group_number: String,
    pub is_returning: bool,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Identity match: trimmed, case-insensitive names and the exact date
    /// of birth. A record whose dob failed to parse never matches.
    pub fn matches(&self, first_name: &str, last_name: &str, dob: NaiveDate) -> bool {
        normalize_name(&self.first_name) == normalize_name(first_name)
            && normalize_name(&self.last_name) == normalize_name(last_name)
            && self.dob == Some(dob)
    }
}

pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

impl TableRow for Patient {
    const KIND: TableKind = TableKind::Patients;

    fn from_record(record: &RecordView<'_>) -> Self {
        Self {
            patient_id: record.text("patient_id"),
            first_name: record.text("first_name"),
            last_name: record.text("last_name"),
            dob: record.date("dob"),
            email: record.text("email"),
            phone: record.text("phone"),
            city: record.text("city"),
            state: record.text("state"),
            zip: record.text("zip"),
            insurance_carrier: record.text("insurance_carrier"),
            member_id: record.text("member_id"),
            group_number: record.text("group_number"),
            is_returning: record.flag("is_returning"),
        }
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.patient_id.clone(),
            self.first_name.clone(),
            self.last_name.clone(),
            codec::format_date(self.dob),
            self.email.clone(),
            self.phone.clone(),
            self.city.clone(),
            self.state.clone(),
            self.zip.clone(),
            self.insurance_carrier.clone(),
            self.member_id.clone(),
            self.group_number.clone(),
            codec::format_bool(self.is_returning),
        ]
    }
}

/// Demographics and insurance collected by the intake form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientIntake {
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub insurance_carrier: String,
    #[serde(default)]
    pub member_id: String,
    #[serde(default)]
    pub group_number: String,
}

impl PatientIntake {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Name and date of birth, once all three are present.
    pub fn identity(&self) -> Result<(String, String, NaiveDate), PatientError> {
        if self.first_name.trim().is_empty() {
            return Err(PatientError::ValidationError("first name is required".to_string()));
        }
        if self.last_name.trim().is_empty() {
            return Err(PatientError::ValidationError("last name is required".to_string()));
        }
        let dob = self
            .dob
            .ok_or_else(|| PatientError::ValidationError("date of birth is required".to_string()))?;
        Ok((self.first_name.clone(), self.last_name.clone(), dob))
    }

    pub fn into_patient(self, patient_id: String) -> Patient {
        Patient {
            patient_id,
            first_name: self.first_name,
            last_name: self.last_name,
            dob: self.dob,
            email: self.email,
            phone: self.phone,
            city: self.city,
            state: self.state,
            zip: self.zip,
            insurance_carrier: self.insurance_carrier,
            member_id: self.member_id,
            group_number: self.group_number,
            is_returning: false,
        }
    }
}

/// Outcome of resolving an intake against the patient table.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientResolution {
    pub patient: Patient,
    pub created: bool,
}

impl PatientResolution {
    pub fn visit_type(&self) -> VisitType {
        VisitType::from_returning(!self.created)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatientLookupQuery {
    pub first_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientLookupResponse {
    pub matched: bool,
    pub patient_id: Option<String>,
    pub visit_type: VisitType,
    pub visit_minutes: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::ValidationError(msg) => AppError::ValidationError(msg),
            PatientError::Store(store) => store.into(),
        }
    }
}
