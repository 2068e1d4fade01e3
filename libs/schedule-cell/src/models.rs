// libs/schedule-cell/src/models.rs
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use shared_database::codec;
use shared_database::{RecordView, StoreError, TableKind, TableRow};
use shared_models::error::AppError;
use shared_models::VisitType;

// ==============================================================================
// SCHEDULE TABLE ROW
// ==============================================================================

/// One atomic availability unit of a doctor's calendar at a location.
///
/// Rows are provisioned externally. The only mutation this system performs
/// is flipping `available` to false when a booking overlaps the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub doctor: String,
    pub location: String,
    pub date: Option<NaiveDate>,
    pub slot_start: Option<NaiveDateTime>,
    pub slot_end: Option<NaiveDateTime>,
    pub available: bool,
}

impl ScheduleSlot {
    pub fn belongs_to(&self, doctor: &str, location: &str, date: NaiveDate) -> bool {
        self.doctor == doctor && self.location == location && self.date == Some(date)
    }

    /// Start and end, when both timestamps parsed.
    pub fn interval(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((self.slot_start?, self.slot_end?))
    }

    /// Open-interval overlap with `[start, end)`. Rows with unparsable
    /// timestamps never overlap anything.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        match self.interval() {
            Some((row_start, row_end)) => row_start < end && start < row_end,
            None => false,
        }
    }
}

impl TableRow for ScheduleSlot {
    const KIND: TableKind = TableKind::Schedules;

    fn from_record(record: &RecordView<'_>) -> Self {
        Self {
            doctor: record.text("doctor"),
            location: record.text("location"),
            date: record.date("date"),
            slot_start: record.timestamp("slot_start"),
            slot_end: record.timestamp("slot_end"),
            available: record.flag("available"),
        }
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.doctor.clone(),
            self.location.clone(),
            codec::format_date(self.date),
            codec::format_timestamp(self.slot_start),
            codec::format_timestamp(self.slot_end),
            codec::format_bool(self.available),
        ]
    }
}

// ==============================================================================
// SLOT ENGINE TYPES
// ==============================================================================

/// Maximal run of contiguous available atomic rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FreeBlock {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl FreeBlock {
    /// Length in whole minutes, truncating any remaining seconds.
    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_seconds() / 60
    }
}

/// A bookable interval of exactly the requested visit duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl CandidateSlot {
    /// Twelve-hour display label, e.g. `09:30 AM - 10:30 AM`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.start.format("%I:%M %p"), self.end.format("%I:%M %p"))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateSlotView {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub label: String,
}

impl From<CandidateSlot> for CandidateSlotView {
    fn from(slot: CandidateSlot) -> Self {
        Self {
            start: slot.start,
            end: slot.end,
            label: slot.label(),
        }
    }
}

/// Result of a slot search. The two empty states are kept apart so callers
/// can tell "nothing provisioned" from "fully booked".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SlotSearchOutcome {
    EmptySchedule,
    NoAvailability,
    Available { slots: Vec<CandidateSlot> },
}

impl SlotSearchOutcome {
    pub fn slots(&self) -> &[CandidateSlot] {
        match self {
            SlotSearchOutcome::Available { slots } => slots,
            _ => &[],
        }
    }
}

// ==============================================================================
// REQUEST / RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SlotQuery {
    pub doctor: String,
    pub location: String,
    pub date: NaiveDate,
    pub visit_type: Option<VisitType>,
    pub duration_minutes: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotSearchResponse {
    pub doctor: String,
    pub location: String,
    pub date: NaiveDate,
    pub duration_minutes: i64,
    pub outcome: &'static str,
    pub slots: Vec<CandidateSlotView>,
}

impl SlotSearchResponse {
    pub fn new(query: &SlotQuery, duration_minutes: i64, outcome: SlotSearchOutcome) -> Self {
        let (outcome, slots) = match outcome {
            SlotSearchOutcome::EmptySchedule => ("empty_schedule", Vec::new()),
            SlotSearchOutcome::NoAvailability => ("no_availability", Vec::new()),
            SlotSearchOutcome::Available { slots } => {
                ("available", slots.into_iter().map(CandidateSlotView::from).collect())
            }
        };

        Self {
            doctor: query.doctor.clone(),
            location: query.location.clone(),
            date: query.date,
            duration_minutes,
            outcome,
            slots,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReservationSummary {
    pub doctor: String,
    pub location: String,
    pub date: NaiveDate,
    pub rows_marked: usize,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Visit duration of {0} minutes is out of range")]
    InvalidDuration(i64),

    #[error("Slot step of {0} minutes is out of range")]
    InvalidStep(i64),

    #[error("Slot end {end} must be after its start {start}")]
    InvalidInterval {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::Store(store) => store.into(),
            other => AppError::ValidationError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    fn row(start: NaiveDateTime, end: NaiveDateTime) -> ScheduleSlot {
        ScheduleSlot {
            doctor: "Dr. A".to_string(),
            location: "Clinic M".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1),
            slot_start: Some(start),
            slot_end: Some(end),
            available: true,
        }
    }

    #[test]
    fn test_overlap_is_open_interval() {
        let r = row(at(9, 0), at(9, 30));
        assert!(r.overlaps(at(9, 0), at(10, 0)));
        assert!(r.overlaps(at(9, 15), at(9, 20)));
        assert!(!r.overlaps(at(9, 30), at(10, 30)));
        assert!(!r.overlaps(at(8, 0), at(9, 0)));
    }

    #[test]
    fn test_row_without_timestamps_never_overlaps() {
        let mut r = row(at(9, 0), at(9, 30));
        r.slot_end = None;
        assert!(!r.overlaps(at(8, 0), at(12, 0)));
        assert_eq!(r.interval(), None);
    }

    #[test]
    fn test_block_minutes_truncate() {
        let block = FreeBlock {
            start: at(9, 0),
            end: at(9, 59) + chrono::Duration::seconds(59),
        };
        assert_eq!(block.minutes(), 59);
    }

    #[test]
    fn test_slot_label() {
        let slot = CandidateSlot {
            start: at(9, 30),
            end: at(13, 0),
        };
        assert_eq!(slot.label(), "09:30 AM - 01:00 PM");
    }

    #[test]
    fn test_search_response_flattens_outcome() {
        let query = SlotQuery {
            doctor: "Dr. A".to_string(),
            location: "Clinic M".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            visit_type: None,
            duration_minutes: None,
        };
        let response = SlotSearchResponse::new(&query, 60, SlotSearchOutcome::NoAvailability);
        assert_eq!(response.outcome, "no_availability");
        assert!(response.slots.is_empty());
    }
}
