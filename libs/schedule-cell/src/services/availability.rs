// libs/schedule-cell/src/services/availability.rs

use chrono::{Duration, NaiveDate};
use tracing::debug;

use shared_config::AppConfig;

use crate::models::{CandidateSlot, FreeBlock, ScheduleError, ScheduleSlot};

/// Turns atomic availability rows into offered candidate slots.
#[derive(Debug, Clone)]
pub struct AvailabilityService {
    step_minutes: i64,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_step(config.slot_step_minutes)
    }

    pub fn with_step(step_minutes: i64) -> Self {
        Self { step_minutes }
    }

    /// Candidate slots of `duration_minutes` for one doctor/location/date.
    ///
    /// Free rows are merged into blocks on exact boundary equality, blocks
    /// shorter than the duration are dropped, and each remaining block is
    /// walked from its start at the configured step. With a step shorter
    /// than the duration the offered slots overlap.
    pub fn candidate_slots(
        &self,
        rows: &[ScheduleSlot],
        doctor: &str,
        location: &str,
        date: NaiveDate,
        duration_minutes: i64,
    ) -> Result<Vec<CandidateSlot>, ScheduleError> {
        if duration_minutes <= 0 {
            return Err(ScheduleError::InvalidDuration(duration_minutes));
        }
        if self.step_minutes <= 0 {
            return Err(ScheduleError::InvalidStep(self.step_minutes));
        }

        let duration = Duration::try_minutes(duration_minutes)
            .ok_or(ScheduleError::InvalidDuration(duration_minutes))?;
        let step = Duration::try_minutes(self.step_minutes)
            .ok_or(ScheduleError::InvalidStep(self.step_minutes))?;

        let day_rows = rows.iter().filter(|row| row.belongs_to(doctor, location, date));
        let blocks = merge_free_blocks(day_rows);

        let slots: Vec<CandidateSlot> = blocks
            .iter()
            .filter(|block| block.minutes() >= duration_minutes)
            .flat_map(|block| enumerate_slots(block, duration, step))
            .collect();

        debug!(
            "{} free blocks, {} candidate slots for {} at {} on {} ({} min)",
            blocks.len(),
            slots.len(),
            doctor,
            location,
            date,
            duration_minutes
        );

        Ok(slots)
    }
}

/// Merges available rows into contiguous blocks.
///
/// Rows are sorted by start; a row extends the current block only when its
/// start equals the block's end exactly. Anything else, gap or overlap,
/// closes the block and opens a new one. Unavailable rows and rows with
/// unparsable timestamps are ignored.
pub fn merge_free_blocks<'a, I>(rows: I) -> Vec<FreeBlock>
where
    I: IntoIterator<Item = &'a ScheduleSlot>,
{
    let mut free: Vec<FreeBlock> = rows
        .into_iter()
        .filter(|row| row.available)
        .filter_map(|row| row.interval())
        .map(|(start, end)| FreeBlock { start, end })
        .collect();
    free.sort_by_key(|block| block.start);

    let mut blocks: Vec<FreeBlock> = Vec::new();
    for next in free {
        if let Some(current) = blocks.last_mut() {
            if next.start == current.end {
                current.end = next.end;
                continue;
            }
        }
        blocks.push(next);
    }
    blocks
}

/// Walks one block emitting `[p, p + duration)` while it fits, advancing
/// `p` by `step`.
pub fn enumerate_slots(block: &FreeBlock, duration: Duration, step: Duration) -> Vec<CandidateSlot> {
    let mut slots = Vec::new();
    let mut pointer = block.start;
    while let Some(end) = pointer.checked_add_signed(duration) {
        if end > block.end {
            break;
        }
        slots.push(CandidateSlot { start: pointer, end });
        match pointer.checked_add_signed(step) {
            Some(next) => pointer = next,
            None => break,
        }
    }
    slots
}
