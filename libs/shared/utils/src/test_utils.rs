use std::path::Path;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::json;
use tempfile::TempDir;

use shared_config::AppConfig;

/// Configuration pointing at a private temporary data directory. The
/// directory lives as long as the `TestConfig`.
pub struct TestConfig {
    pub dir: TempDir,
    pub config: AppConfig,
}

impl Default for TestConfig {
    fn default() -> Self {
        let dir = tempfile::tempdir().expect("temporary data directory");
        let config = AppConfig {
            data_dir: dir.path().to_path_buf(),
            calendar_max_date: NaiveDate::from_ymd_opt(2030, 12, 31).expect("valid date"),
            ..AppConfig::default()
        };
        Self { dir, config }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        self.config.clone()
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }

    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_schedules(&self, csv: &str) {
        std::fs::write(self.config.schedules_path(), csv).expect("write schedule fixture");
    }

    pub fn write_patients(&self, csv: &str) {
        std::fs::write(self.config.patients_path(), csv).expect("write patient fixture");
    }

    pub fn read_schedules(&self) -> String {
        std::fs::read_to_string(self.config.schedules_path()).expect("read schedule file")
    }

    pub fn read_patients(&self) -> String {
        std::fs::read_to_string(self.config.patients_path()).expect("read patient file")
    }

    pub fn read_appointments(&self) -> String {
        std::fs::read_to_string(self.config.appointments_path()).expect("read appointment file")
    }
}

/// Builds schedule CSV text out of fixed-granularity atomic rows.
pub struct ScheduleFixture {
    lines: Vec<String>,
}

impl Default for ScheduleFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleFixture {
    pub const HEADER: &'static str = "doctor,location,date,slot_start,slot_end,available";

    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Appends `count` contiguous rows of `minutes` each starting at `start`.
    pub fn run(
        mut self,
        doctor: &str,
        location: &str,
        date: NaiveDate,
        start: NaiveTime,
        minutes: i64,
        count: usize,
        available: bool,
    ) -> Self {
        let mut cursor = date.and_time(start);
        for _ in 0..count {
            let end = cursor + Duration::minutes(minutes);
            self.lines.push(Self::line(doctor, location, date, cursor, end, available));
            cursor = end;
        }
        self
    }

    pub fn row(
        mut self,
        doctor: &str,
        location: &str,
        date: NaiveDate,
        start: NaiveDateTime,
        end: NaiveDateTime,
        available: bool,
    ) -> Self {
        self.lines.push(Self::line(doctor, location, date, start, end, available));
        self
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::from(Self::HEADER);
        out.push('\n');
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    fn line(
        doctor: &str,
        location: &str,
        date: NaiveDate,
        start: NaiveDateTime,
        end: NaiveDateTime,
        available: bool,
    ) -> String {
        format!(
            "{},{},{},{},{},{}",
            doctor,
            location,
            date.format("%Y-%m-%d"),
            start.format("%Y-%m-%d %H:%M:%S"),
            end.format("%Y-%m-%d %H:%M:%S"),
            if available { "True" } else { "False" }
        )
    }
}

pub struct TestIntake;

impl TestIntake {
    /// JSON body of a booking request for the standard test patient.
    pub fn booking_body(
        first_name: &str,
        last_name: &str,
        dob: &str,
        doctor: &str,
        location: &str,
        date: &str,
        start: &str,
        end: &str,
    ) -> serde_json::Value {
        json!({
            "patient": {
                "first_name": first_name,
                "last_name": last_name,
                "dob": dob,
                "email": "jane@example.com",
                "phone": "555-0100",
                "city": "Springfield",
                "state": "IL",
                "zip": "62701",
                "insurance_carrier": "Acme Health",
                "member_id": "M-100",
                "group_number": "G-7"
            },
            "doctor": doctor,
            "location": location,
            "date": date,
            "slot_start": start,
            "slot_end": end
        })
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("fixture date")
}

pub fn time(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").expect("fixture time")
}

pub fn at(day: &str, clock: &str) -> NaiveDateTime {
    date(day).and_time(time(clock))
}
