//! Follow-up scheduling for extracted action items.
//!
//! Each item runs through four steps:
//! - [`extract_due_date`]: look for a deadline in the text
//! - [`derive_target_date`]: pick the day to prepare around
//! - [`allocate_slot`]: find a free band hour, weekdays only, 30 min apart
//! - [`duration_hours`]: decide how long to block
//!
//! [`FollowUpScheduler`] owns the booked-slot history for one run, so items
//! processed earlier get first choice of the preferred hours.

pub mod due_date;
pub mod duration;
pub mod proposal;
pub mod slots;
pub mod target;

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub use due_date::{extract_due_date, DueDate};
pub use duration::{duration_hours, event_duration};
pub use proposal::{reminders_for, truncate_title, ColorTag, EventProposal, Reminder, ReminderChannel};
pub use slots::{allocate_slot, hour_band, AllocationPath, BookedSlots, SlotAllocation};
pub use target::derive_target_date;

use crate::action::ActionItem;
use crate::clock::Clock;
use crate::integrations::CalendarSink;

/// Every decision taken for one action item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpPlan {
    pub item: ActionItem,
    pub due_date: DueDate,
    pub target: NaiveDateTime,
    pub slot: SlotAllocation,
    pub proposal: EventProposal,
}

/// Result of handing a proposal to the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Delivery {
    Created { event_id: String },
    Failed { reason: String },
}

impl Delivery {
    pub fn is_created(&self) -> bool {
        matches!(self, Delivery::Created { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpOutcome {
    pub plan: FollowUpPlan,
    pub delivery: Delivery,
}

/// Plans calendar follow-ups for one scheduling run.
///
/// Not shared across threads or runs: create a fresh scheduler per run.
pub struct FollowUpScheduler {
    clock: Arc<dyn Clock>,
    booked: BookedSlots,
}

impl FollowUpScheduler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            booked: BookedSlots::new(),
        }
    }

    /// Start from an existing booked-slot history.
    pub fn with_history(clock: Arc<dyn Clock>, booked: BookedSlots) -> Self {
        Self { clock, booked }
    }

    pub fn booked(&self) -> &BookedSlots {
        &self.booked
    }

    /// Decide when and for how long to schedule `item`, booking its slot.
    pub fn plan(&mut self, item: &ActionItem) -> FollowUpPlan {
        let now = self.clock.now();
        let due_date = extract_due_date(&item.description, now);
        let target = derive_target_date(due_date, item.priority, now);
        let slot = allocate_slot(target, item.priority, &mut self.booked);
        let duration = event_duration(&item.description, item.priority);
        let proposal = proposal::build_proposal(item, due_date, slot.start, duration);

        tracing::debug!(
            title = %proposal.title,
            priority = %item.priority,
            start = %proposal.start_time,
            fallback = slot.is_fallback(),
            "planned follow-up"
        );

        FollowUpPlan {
            item: item.clone(),
            due_date,
            target,
            slot,
            proposal,
        }
    }

    /// Plan `item` and submit it to `sink`.
    ///
    /// A rejected write is reported in the outcome; the slot stays booked.
    pub fn schedule(&mut self, item: &ActionItem, sink: &dyn CalendarSink) -> FollowUpOutcome {
        let plan = self.plan(item);
        let delivery = match sink.create_event(&plan.proposal) {
            Ok(event_id) => {
                tracing::info!(%event_id, title = %plan.proposal.title, "calendar event created");
                Delivery::Created { event_id }
            }
            Err(e) => {
                tracing::error!(title = %plan.proposal.title, error = %e, "failed to create calendar event");
                Delivery::Failed {
                    reason: e.to_string(),
                }
            }
        };
        FollowUpOutcome { plan, delivery }
    }

    /// Schedule items in order; a failure on one item never stops the rest.
    pub fn schedule_all(
        &mut self,
        items: &[ActionItem],
        sink: &dyn CalendarSink,
    ) -> Vec<FollowUpOutcome> {
        items.iter().map(|item| self.schedule(item, sink)).collect()
    }
}
