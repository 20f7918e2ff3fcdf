//! Event length from keyword heuristics.

use chrono::Duration;

use crate::action::Priority;

const LONG_MEETING_KEYWORDS: &[&str] = &[
    "meeting",
    "presentation",
    "review",
    "discussion",
    "training",
    "session",
    "workshop",
    "interview",
    "negotiation",
];

const SHORT_TASK_KEYWORDS: &[&str] = &[
    "submit", "send", "call", "email", "update", "change", "check", "verify", "approve", "sign",
];

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

/// Whole hours to block for an item.
///
/// Long-meeting wording gets two hours at high priority and one otherwise.
/// Short tasks and everything else get one hour at every priority.
pub fn duration_hours(description: &str, priority: Priority) -> i64 {
    let lowered = description.to_lowercase();
    if contains_any(&lowered, LONG_MEETING_KEYWORDS) {
        if priority == Priority::High {
            2
        } else {
            1
        }
    } else if contains_any(&lowered, SHORT_TASK_KEYWORDS) {
        1
    } else {
        // TODO: shorter default for low-priority items once the desired
        // length is agreed; every tier currently gets one hour.
        1
    }
}

pub fn event_duration(description: &str, priority: Priority) -> Duration {
    Duration::hours(duration_hours(description, priority))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_meeting_high_priority_is_two_hours() {
        assert_eq!(duration_hours("Schedule a meeting with the team", Priority::High), 2);
        assert_eq!(duration_hours("Quarterly REVIEW of vendors", Priority::High), 2);
    }

    #[test]
    fn long_meeting_other_priorities_is_one_hour() {
        assert_eq!(duration_hours("Review budget", Priority::Medium), 1);
        assert_eq!(duration_hours("Prepare workshop agenda", Priority::Low), 1);
    }

    #[test]
    fn short_tasks_are_one_hour_at_every_priority() {
        for priority in [Priority::High, Priority::Medium, Priority::Low] {
            assert_eq!(duration_hours("Submit the report", priority), 1);
        }
    }

    #[test]
    fn unmatched_text_defaults_to_one_hour() {
        assert_eq!(duration_hours("Buy coffee", Priority::Low), 1);
        assert_eq!(duration_hours("Buy coffee", Priority::High), 1);
    }

    #[test]
    fn keywords_match_as_substrings() {
        // "recall" contains "call"; "sessions" contains "session".
        assert_eq!(duration_hours("Recall the shipment", Priority::High), 1);
        assert_eq!(duration_hours("Plan sessions", Priority::High), 2);
        assert_eq!(event_duration("Plan sessions", Priority::High), Duration::hours(2));
    }
}
