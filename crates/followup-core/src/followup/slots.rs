//! Slot allocation within per-priority business-hour bands.
//!
//! The allocator walks a 14-day window starting at the target date,
//! skipping weekends, and takes the first band hour that keeps at least
//! [`MIN_SPACING_SECS`] between it and every slot already booked in the
//! run. When the window is exhausted it falls back to a slot that ignores
//! the band, the weekend rule and the spacing guarantee.

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::action::Priority;

/// Minimum distance between two slots booked in the same run.
pub const MIN_SPACING_SECS: i64 = 1800;

/// Number of days searched before falling back.
pub const SEARCH_WINDOW_DAYS: i64 = 14;

/// Preferred start hours for a tier, tried in order within each day.
pub fn hour_band(priority: Priority) -> &'static [u32] {
    match priority {
        Priority::High => &[9, 10, 11],
        Priority::Medium => &[13, 14, 15],
        Priority::Low => &[16, 17],
    }
}

/// Start times already handed out during one scheduling run.
///
/// Grows monotonically; a slot stays booked even when the calendar write
/// that followed it failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedSlots {
    starts: Vec<NaiveDateTime>,
}

impl BookedSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with a synthetic history.
    pub fn from_starts(starts: impl IntoIterator<Item = NaiveDateTime>) -> Self {
        Self {
            starts: starts.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Whether `candidate` keeps the minimum spacing to every booked slot.
    pub fn is_clear(&self, candidate: NaiveDateTime) -> bool {
        self.starts
            .iter()
            .all(|s| (candidate - *s).num_seconds().abs() >= MIN_SPACING_SECS)
    }

    fn book(&mut self, start: NaiveDateTime) {
        self.starts.push(start);
    }
}

/// How a slot was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationPath {
    /// Found inside the band on a weekday within the search window.
    Search,
    /// Window exhausted; spacing, band and weekday rules not guaranteed.
    Fallback,
}

/// A slot handed out by [`allocate_slot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAllocation {
    pub start: NaiveDateTime,
    pub path: AllocationPath,
}

impl SlotAllocation {
    pub fn is_fallback(&self) -> bool {
        self.path == AllocationPath::Fallback
    }
}

fn is_weekend(day: NaiveDateTime) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Find the next open slot for `priority` on or after `target` and book it.
///
/// Deterministic: the same target, priority and history always produce the
/// same slot.
pub fn allocate_slot(
    target: NaiveDateTime,
    priority: Priority,
    booked: &mut BookedSlots,
) -> SlotAllocation {
    let band = hour_band(priority);
    let first_hour = NaiveTime::from_hms_opt(band[0], 0, 0).unwrap_or(NaiveTime::MIN);
    let start_of_search = target.date().and_time(first_hour);

    for day_offset in 0..SEARCH_WINDOW_DAYS {
        let day = start_of_search + Duration::days(day_offset);
        if is_weekend(day) {
            continue;
        }

        for &hour in band {
            let Some(time) = NaiveTime::from_hms_opt(hour, 0, 0) else {
                continue;
            };
            let candidate = day.date().and_time(time);
            if booked.is_clear(candidate) {
                booked.book(candidate);
                return SlotAllocation {
                    start: candidate,
                    path: AllocationPath::Search,
                };
            }
        }
    }

    let fallback = start_of_search + Duration::days((booked.len() / 3) as i64);
    tracing::warn!(
        %target,
        priority = %priority,
        booked = booked.len(),
        slot = %fallback,
        "no open slot in search window; using fallback slot"
    );
    booked.book(fallback);
    SlotAllocation {
        start: fallback,
        path: AllocationPath::Fallback,
    }
}
