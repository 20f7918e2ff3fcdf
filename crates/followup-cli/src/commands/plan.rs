use std::sync::Arc;

use chrono::NaiveDateTime;
use clap::Args;
use followup_core::integrations::DryRunSink;
use followup_core::{ActionItem, Clock, FixedClock, FollowUpScheduler, Priority, SystemClock};

#[derive(Args)]
pub struct PlanArgs {
    /// Action item text, e.g. "Submit final report by December 20th, 2024"
    pub description: String,
    /// high, medium or low
    #[arg(long, default_value = "medium")]
    pub priority: Priority,
    /// Pretend the current time is this (YYYY-MM-DDTHH:MM[:SS])
    #[arg(long, value_parser = parse_now)]
    pub now: Option<NaiveDateTime>,
    /// Source document shown in the event description
    #[arg(long, default_value = "manual")]
    pub source: String,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_now(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M"))
        .map_err(|e| format!("invalid datetime '{s}': {e}"))
}

pub fn run(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let clock: Arc<dyn Clock> = match args.now {
        Some(now) => Arc::new(FixedClock(now)),
        None => Arc::new(SystemClock),
    };
    let item = ActionItem::new(args.description, args.priority, args.source);
    let mut scheduler = FollowUpScheduler::new(clock);
    let outcome = scheduler.schedule(&item, &DryRunSink::new());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.plan)?);
        return Ok(());
    }

    let proposal = &outcome.plan.proposal;
    println!("Title:    {}", proposal.title);
    println!(
        "When:     {} - {} ({} min)",
        proposal.start_time.format("%a %Y-%m-%d %H:%M"),
        proposal.end_time.format("%H:%M"),
        proposal.duration_minutes()
    );
    match outcome.plan.due_date.date() {
        Some(due) => println!("Due:      {due}"),
        None => println!("Due:      (none found)"),
    }
    if outcome.plan.slot.is_fallback() {
        println!("Note:     no free slot in the search window; fallback slot used");
    }
    let reminders: Vec<_> = proposal
        .reminders
        .iter()
        .map(|r| format!("{} {}m", r.channel.as_str(), r.minutes_before))
        .collect();
    println!("Remind:   {}", reminders.join(", "));
    println!();
    println!("{}", proposal.description);
    Ok(())
}
