//! End-to-end follow-up planning through the public API.

use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Weekday};
use followup_core::followup::{ColorTag, ReminderChannel};
use followup_core::integrations::DryRunSink;
use followup_core::{ActionItem, Delivery, DueDate, FixedClock, FollowUpScheduler, Priority};

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn scheduler(now: NaiveDateTime) -> FollowUpScheduler {
    FollowUpScheduler::new(Arc::new(FixedClock(now)))
}

#[test]
fn high_priority_deadline_lands_day_before_at_nine() {
    let mut scheduler = scheduler(at(2024, 12, 1, 0));
    let item = ActionItem::new(
        "Submit final report by December 20th, 2024",
        Priority::High,
        "Q4 planning.docx",
    );
    let sink = DryRunSink::new();
    let outcome = scheduler.schedule(&item, &sink);

    let plan = &outcome.plan;
    assert_eq!(plan.due_date, DueDate::Found(NaiveDate::from_ymd_opt(2024, 12, 20).unwrap()));
    assert_eq!(plan.target, at(2024, 12, 19, 0));
    assert_eq!(plan.proposal.start_time, at(2024, 12, 19, 9));
    assert_eq!(plan.proposal.end_time, at(2024, 12, 19, 10));
    assert_eq!(plan.proposal.color, ColorTag::Red);
    assert_eq!(plan.proposal.reminders[0].channel, ReminderChannel::Email);
    assert_eq!(plan.proposal.reminders[0].minutes_before, 24 * 60);
    assert!(plan.proposal.description.contains("Due date: 2024-12-20"));
    assert!(matches!(outcome.delivery, Delivery::Created { .. }));
    assert_eq!(sink.recorded().len(), 1);
}

#[test]
fn undated_medium_review_books_wednesday_afternoon_for_one_hour() {
    let mut scheduler = scheduler(at(2025, 1, 6, 0));
    let item = ActionItem::new("Review budget", Priority::Medium, "budget.xlsx");
    let plan = scheduler.plan(&item);

    assert_eq!(plan.due_date, DueDate::NotFound);
    assert_eq!(plan.target, at(2025, 1, 8, 0));
    assert_eq!(plan.proposal.start_time, at(2025, 1, 8, 13));
    assert_eq!(plan.proposal.duration_minutes(), 60);
    assert_eq!(plan.proposal.color, ColorTag::Yellow);
}

#[test]
fn high_priority_meeting_gets_two_hours() {
    let mut scheduler = scheduler(at(2025, 1, 6, 0));
    let plan = scheduler.plan(&ActionItem::new(
        "Schedule a meeting with the team",
        Priority::High,
        "notes.md",
    ));
    assert_eq!(plan.proposal.duration_minutes(), 120);
}

#[test]
fn past_deadline_clamps_to_tomorrow() {
    let now = at(2025, 3, 10, 8);
    let mut scheduler = scheduler(now);
    let plan = scheduler.plan(&ActionItem::new(
        "Approve invoice by 03/10/2025",
        Priority::High,
        "ap.csv",
    ));
    assert_eq!(plan.target, now + Duration::days(1));
    assert_eq!(plan.proposal.start_time, at(2025, 3, 11, 9));
}

#[test]
fn run_fills_band_then_moves_to_next_weekday() {
    // Friday: four high items take 9, 10, 11 and then Monday 9.
    let mut scheduler = scheduler(at(2025, 1, 9, 0));
    let starts: Vec<_> = (0..4)
        .map(|i| {
            scheduler
                .plan(&ActionItem::new(format!("Send update {i}"), Priority::High, "x"))
                .proposal
                .start_time
        })
        .collect();

    assert_eq!(
        starts,
        vec![
            at(2025, 1, 10, 9),
            at(2025, 1, 10, 10),
            at(2025, 1, 10, 11),
            at(2025, 1, 13, 9),
        ]
    );
    for start in &starts {
        assert!(!matches!(start.weekday(), Weekday::Sat | Weekday::Sun));
        assert!([9, 10, 11].contains(&start.hour()));
    }
    assert_eq!(scheduler.booked().len(), 4);
}

#[test]
fn schedule_all_keeps_going_after_sink_failures() {
    use followup_core::error::SinkError;
    use followup_core::{CalendarSink, EventProposal};

    struct Rejecting;
    impl CalendarSink for Rejecting {
        fn create_event(&self, _proposal: &EventProposal) -> Result<String, SinkError> {
            Err(SinkError::NotAuthenticated("google".into()))
        }
    }

    let mut scheduler = scheduler(at(2025, 1, 6, 0));
    let items = vec![
        ActionItem::new("Call vendor", Priority::Low, "a"),
        ActionItem::new("Check contract", Priority::Low, "a"),
    ];
    let outcomes = scheduler.schedule_all(&items, &Rejecting);

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| !o.delivery.is_created()));
    // Failed writes still consume their slots.
    assert_eq!(outcomes[0].plan.proposal.start_time, at(2025, 1, 9, 16));
    assert_eq!(outcomes[1].plan.proposal.start_time, at(2025, 1, 9, 17));
}
