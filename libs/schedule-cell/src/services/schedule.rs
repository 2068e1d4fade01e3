// libs/schedule-cell/src/services/schedule.rs

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_database::FlatFileStore;

use crate::models::{ReservationSummary, ScheduleError, ScheduleSlot, SlotSearchOutcome};
use crate::services::availability::AvailabilityService;

pub struct ScheduleService {
    store: FlatFileStore,
    availability: AvailabilityService,
}

impl ScheduleService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: FlatFileStore::new(config),
            availability: AvailabilityService::new(config),
        }
    }

    pub fn load_schedule(&self) -> Result<Vec<ScheduleSlot>, ScheduleError> {
        Ok(self.store.load::<ScheduleSlot>()?)
    }

    /// Distinct doctors named in the schedule, sorted.
    pub fn doctors(&self) -> Result<Vec<String>, ScheduleError> {
        let rows = self.load_schedule()?;
        Ok(distinct_sorted(rows.iter().map(|row| row.doctor.as_str())))
    }

    /// Distinct locations named in the schedule, sorted.
    pub fn locations(&self) -> Result<Vec<String>, ScheduleError> {
        let rows = self.load_schedule()?;
        Ok(distinct_sorted(rows.iter().map(|row| row.location.as_str())))
    }

    pub fn search_slots(
        &self,
        doctor: &str,
        location: &str,
        date: NaiveDate,
        duration_minutes: i64,
    ) -> Result<SlotSearchOutcome, ScheduleError> {
        let rows = self.load_schedule()?;
        if rows.is_empty() {
            debug!("Schedule table is empty");
            return Ok(SlotSearchOutcome::EmptySchedule);
        }

        let slots = self
            .availability
            .candidate_slots(&rows, doctor, location, date, duration_minutes)?;

        if slots.is_empty() {
            Ok(SlotSearchOutcome::NoAvailability)
        } else {
            Ok(SlotSearchOutcome::Available { slots })
        }
    }

    /// Marks every row of the doctor/location/date overlapping
    /// `[start, end)` unavailable and rewrites the schedule file.
    pub fn reserve(
        &self,
        doctor: &str,
        location: &str,
        date: NaiveDate,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<ReservationSummary, ScheduleError> {
        if end <= start {
            return Err(ScheduleError::InvalidInterval { start, end });
        }

        let mut rows = self.load_schedule()?;
        let rows_marked = mark_unavailable(&mut rows, doctor, location, date, start, end);
        if rows_marked == 0 {
            warn!(
                "Reservation {} - {} for {} at {} overlapped no schedule rows",
                start, end, doctor, location
            );
        }
        self.store.save(&rows)?;

        info!(
            "Reserved {} - {} for {} at {} ({} rows marked unavailable)",
            start, end, doctor, location, rows_marked
        );

        Ok(ReservationSummary {
            doctor: doctor.to_string(),
            location: location.to_string(),
            date,
            rows_marked,
        })
    }

    /// Admin replace-upload of the whole schedule table.
    pub fn import_csv(&self, body: &[u8]) -> Result<usize, ScheduleError> {
        Ok(self.store.import::<ScheduleSlot>(body)?)
    }
}

/// Flips `available` off on every matching row that overlaps `[start, end)`
/// and returns how many rows were touched. Rows already unavailable still
/// count when they overlap.
pub fn mark_unavailable(
    rows: &mut [ScheduleSlot],
    doctor: &str,
    location: &str,
    date: NaiveDate,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> usize {
    let mut marked = 0;
    for row in rows
        .iter_mut()
        .filter(|row| row.belongs_to(doctor, location, date) && row.overlaps(start, end))
    {
        row.available = false;
        marked += 1;
    }
    marked
}

fn distinct_sorted<'a, I>(values: I) -> Vec<String>
where
    I: Iterator<Item = &'a str>,
{
    values
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
