use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;

use shared_config::AppConfig;

use crate::codec;

pub const PATIENT_COLUMNS: [&str; 13] = [
    "patient_id",
    "first_name",
    "last_name",
    "dob",
    "email",
    "phone",
    "city",
    "state",
    "zip",
    "insurance_carrier",
    "member_id",
    "group_number",
    "is_returning",
];

pub const SCHEDULE_COLUMNS: [&str; 6] = [
    "doctor",
    "location",
    "date",
    "slot_start",
    "slot_end",
    "available",
];

pub const APPOINTMENT_COLUMNS: [&str; 25] = [
    "appointment_id",
    "created_at",
    "patient_id",
    "patient_name",
    "dob",
    "email",
    "phone",
    "city",
    "state",
    "zip",
    "doctor",
    "location",
    "visit_type",
    "appointment_date",
    "slot_start",
    "slot_end",
    "insurance_carrier",
    "member_id",
    "group_number",
    "status",
    "forms_sent",
    "reminder_1",
    "reminder_2",
    "reminder_3",
    "cancellation_reason",
];

/// The three flat tables backing the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Patients,
    Schedules,
    Appointments,
}

impl TableKind {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            TableKind::Patients => &PATIENT_COLUMNS,
            TableKind::Schedules => &SCHEDULE_COLUMNS,
            TableKind::Appointments => &APPOINTMENT_COLUMNS,
        }
    }

    pub fn path(&self, config: &AppConfig) -> PathBuf {
        match self {
            TableKind::Patients => config.patients_path(),
            TableKind::Schedules => config.schedules_path(),
            TableKind::Appointments => config.appointments_path(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TableKind::Patients => "patients",
            TableKind::Schedules => "schedules",
            TableKind::Appointments => "appointments",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A typed row of one of the tables.
///
/// Decoding looks cells up by column name, so column order in the file does
/// not matter, unknown columns are ignored and missing ones decode to their
/// default. Encoding must follow `KIND.columns()` order.
pub trait TableRow: Sized {
    const KIND: TableKind;

    fn from_record(record: &RecordView<'_>) -> Self;

    fn to_record(&self) -> Vec<String>;
}

/// Read access to one CSV record through the file's header index.
pub struct RecordView<'a> {
    index: &'a HashMap<String, usize>,
    record: &'a StringRecord,
}

impl<'a> RecordView<'a> {
    pub fn new(index: &'a HashMap<String, usize>, record: &'a StringRecord) -> Self {
        Self { index, record }
    }

    pub fn raw(&self, column: &str) -> &'a str {
        self.index
            .get(column)
            .and_then(|i| self.record.get(*i))
            .unwrap_or("")
    }

    pub fn text(&self, column: &str) -> String {
        self.raw(column).to_string()
    }

    pub fn date(&self, column: &str) -> Option<NaiveDate> {
        codec::parse_date(self.raw(column))
    }

    pub fn timestamp(&self, column: &str) -> Option<NaiveDateTime> {
        codec::parse_timestamp(self.raw(column))
    }

    pub fn flag(&self, column: &str) -> bool {
        codec::parse_bool(self.raw(column)).unwrap_or(false)
    }
}

/// Builds the column-name index for a header record. Header cells are
/// trimmed and a leading byte-order mark is dropped.
pub fn header_index(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim_start_matches('\u{feff}').trim().to_string(), i))
        .collect()
}
