use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use tracing::warn;

pub const DEFAULT_NEW_VISIT_MINUTES: i64 = 60;
pub const DEFAULT_RETURNING_VISIT_MINUTES: i64 = 30;
pub const DEFAULT_SLOT_STEP_MINUTES: i64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub patients_file: String,
    pub schedules_file: String,
    pub appointments_file: String,
    pub bind_addr: String,
    pub new_visit_minutes: i64,
    pub returning_visit_minutes: i64,
    pub slot_step_minutes: i64,
    pub calendar_min_date: NaiveDate,
    pub calendar_max_date: NaiveDate,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            patients_file: "patients.csv".to_string(),
            schedules_file: "doctor_schedules.csv".to_string(),
            appointments_file: "appointments.csv".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            new_visit_minutes: DEFAULT_NEW_VISIT_MINUTES,
            returning_visit_minutes: DEFAULT_RETURNING_VISIT_MINUTES,
            slot_step_minutes: DEFAULT_SLOT_STEP_MINUTES,
            calendar_min_date: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN),
            calendar_max_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or(NaiveDate::MAX),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, falling back to the
    /// defaults for absent or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            data_dir: lookup("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| {
                    warn!("DATA_DIR not set, using {}", defaults.data_dir.display());
                    defaults.data_dir.clone()
                }),
            patients_file: lookup("PATIENTS_FILE").unwrap_or(defaults.patients_file),
            schedules_file: lookup("SCHEDULES_FILE").unwrap_or(defaults.schedules_file),
            appointments_file: lookup("APPOINTMENTS_FILE").unwrap_or(defaults.appointments_file),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| {
                warn!("BIND_ADDR not set, using default");
                defaults.bind_addr
            }),
            new_visit_minutes: parse_or(&lookup, "NEW_VISIT_MINUTES", defaults.new_visit_minutes),
            returning_visit_minutes: parse_or(
                &lookup,
                "RETURNING_VISIT_MINUTES",
                defaults.returning_visit_minutes,
            ),
            slot_step_minutes: parse_or(&lookup, "SLOT_STEP_MINUTES", defaults.slot_step_minutes),
            calendar_min_date: parse_or(&lookup, "CALENDAR_MIN_DATE", defaults.calendar_min_date),
            calendar_max_date: parse_or(&lookup, "CALENDAR_MAX_DATE", defaults.calendar_max_date),
        };

        if !config.is_configured() {
            warn!(
                "Data directory {} does not exist yet - stores will start empty",
                config.data_dir.display()
            );
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        self.data_dir.is_dir()
    }

    pub fn patients_path(&self) -> PathBuf {
        self.data_dir.join(&self.patients_file)
    }

    pub fn schedules_path(&self) -> PathBuf {
        self.data_dir.join(&self.schedules_file)
    }

    pub fn appointments_path(&self) -> PathBuf {
        self.data_dir.join(&self.appointments_file)
    }

    /// Visit length in minutes: returning patients get the short visit.
    pub fn visit_minutes(&self, is_returning: bool) -> i64 {
        if is_returning {
            self.returning_visit_minutes
        } else {
            self.new_visit_minutes
        }
    }

    pub fn is_within_calendar(&self, date: NaiveDate) -> bool {
        date >= self.calendar_min_date && date <= self.calendar_max_date
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has an invalid value {:?}, using default", key, raw);
            default
        }),
        None => default,
    }
}
