//! Target preparation date: the point around which a slot is sought.

use chrono::{Duration, NaiveDateTime, NaiveTime};

use super::due_date::DueDate;
use crate::action::Priority;

/// Days of lead time before a known deadline.
fn lead_days(priority: Priority) -> i64 {
    match priority {
        Priority::High => 1,
        Priority::Medium | Priority::Low => 3,
    }
}

/// Days from now when nothing pins the item to a deadline.
fn default_offset_days(priority: Priority) -> i64 {
    match priority {
        Priority::High => 1,
        Priority::Medium => 2,
        Priority::Low => 3,
    }
}

/// Derive the target date for an item.
///
/// With a deadline, the target sits one day (high) or three days (other
/// tiers) before it, clamped to tomorrow when that is already in the past.
/// Without one, the target is 1/2/3 days out for high/medium/low.
pub fn derive_target_date(due: DueDate, priority: Priority, now: NaiveDateTime) -> NaiveDateTime {
    match due {
        DueDate::Found(date) => {
            let target = date.and_time(NaiveTime::MIN) - Duration::days(lead_days(priority));
            if target < now {
                now + Duration::days(1)
            } else {
                target
            }
        }
        DueDate::NotFound => now + Duration::days(default_offset_days(priority)),
    }
}
