//! Cell-level conversions between the text stored in table files and typed
//! values. Reads are lenient: anything unparsable becomes `None` and the row
//! is kept. Writes always use one canonical format per type.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const TIMESTAMP_INPUT_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_INPUT_FORMATS: [&str; 2] = [DATE_FORMAT, "%m/%d/%Y"];

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    DATE_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| parse_naive_timestamp(value).map(|ts| ts.date()))
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    parse_naive_timestamp(value).or_else(|| {
        DATE_INPUT_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
            .map(|date| date.and_time(NaiveTime::MIN))
    })
}

fn parse_naive_timestamp(value: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Spreadsheet exports write booleans in several spellings, including
/// floats when a column held blanks.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" | "1.0" => Some(true),
        "false" | "f" | "no" | "n" | "0" | "0.0" => Some(false),
        _ => None,
    }
}

pub fn format_date(value: Option<NaiveDate>) -> String {
    value
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn format_timestamp(value: Option<NaiveDateTime>) -> String {
    value
        .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn format_bool(value: bool) -> String {
    if value { "True" } else { "False" }.to_string()
}
