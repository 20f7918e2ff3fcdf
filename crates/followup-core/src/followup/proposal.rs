//! Calendar event proposals assembled from a planned action item.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::due_date::DueDate;
use crate::action::{ActionItem, Priority};

const TITLE_MAX_CHARS: usize = 50;

/// How a reminder is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderChannel {
    Email,
    Popup,
}

impl ReminderChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderChannel::Email => "email",
            ReminderChannel::Popup => "popup",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub channel: ReminderChannel,
    pub minutes_before: u32,
}

/// Event colour, mapped from priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Red,
    Yellow,
    Green,
}

impl From<Priority> for ColorTag {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::High => ColorTag::Red,
            Priority::Medium => ColorTag::Yellow,
            Priority::Low => ColorTag::Green,
        }
    }
}

/// Reminders attached to an event of the given tier.
pub fn reminders_for(priority: Priority) -> Vec<Reminder> {
    let email_minutes = match priority {
        Priority::High => 24 * 60,
        Priority::Medium | Priority::Low => 60,
    };
    vec![
        Reminder {
            channel: ReminderChannel::Email,
            minutes_before: email_minutes,
        },
        Reminder {
            channel: ReminderChannel::Popup,
            minutes_before: 15,
        },
    ]
}

/// A finalized calendar event, ready for a [`CalendarSink`](crate::integrations::CalendarSink).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventProposal {
    pub title: String,
    pub description: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub reminders: Vec<Reminder>,
    pub color: ColorTag,
}

impl EventProposal {
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

/// Cut to 50 characters, appending an ellipsis when anything was dropped.
pub fn truncate_title(description: &str) -> String {
    let trimmed = description.trim();
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        let mut title: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();
        title.push_str("...");
        title
    } else {
        trimmed.to_string()
    }
}

fn describe(item: &ActionItem, due: DueDate) -> String {
    let mut body = format!(
        "Priority: {}\nSource document: {}\n",
        item.priority.as_str().to_uppercase(),
        item.source_document
    );
    if let Some(date) = due.date() {
        body.push_str(&format!("Due date: {}\n", date.format("%Y-%m-%d")));
    }
    body.push_str(&format!("\nAction item:\n{}\n", item.description.trim()));
    body
}

pub(crate) fn build_proposal(
    item: &ActionItem,
    due: DueDate,
    start_time: NaiveDateTime,
    duration: chrono::Duration,
) -> EventProposal {
    EventProposal {
        title: truncate_title(&item.description),
        description: describe(item, due),
        start_time,
        end_time: start_time + duration,
        reminders: reminders_for(item.priority),
        color: item.priority.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    #[test]
    fn short_titles_are_kept() {
        assert_eq!(truncate_title("  Submit the report "), "Submit the report");
    }

    #[test]
    fn long_titles_are_cut_at_fifty_chars() {
        let long = "a".repeat(51);
        let title = truncate_title(&long);
        assert_eq!(title, format!("{}...", "a".repeat(50)));

        let exact = "b".repeat(50);
        assert_eq!(truncate_title(&exact), exact);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let long = "é".repeat(60);
        let title = truncate_title(&long);
        assert_eq!(title.chars().count(), 53);
    }

    #[test]
    fn reminders_and_colors_follow_priority() {
        assert_eq!(
            reminders_for(Priority::High),
            vec![
                Reminder { channel: ReminderChannel::Email, minutes_before: 1440 },
                Reminder { channel: ReminderChannel::Popup, minutes_before: 15 },
            ]
        );
        assert_eq!(reminders_for(Priority::Low)[0].minutes_before, 60);
        assert_eq!(ColorTag::from(Priority::High), ColorTag::Red);
        assert_eq!(ColorTag::from(Priority::Medium), ColorTag::Yellow);
        assert_eq!(ColorTag::from(Priority::Low), ColorTag::Green);
    }

    #[test]
    fn description_block_is_priority_tagged() {
        let item = ActionItem::new("Submit final report", Priority::High, "Q4 plan.docx");
        let due = DueDate::Found(NaiveDate::from_ymd_opt(2024, 12, 20).unwrap());
        let start = NaiveDate::from_ymd_opt(2024, 12, 19)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let proposal = build_proposal(&item, due, start, Duration::hours(1));

        assert!(proposal.description.starts_with("Priority: HIGH\n"));
        assert!(proposal.description.contains("Source document: Q4 plan.docx"));
        assert!(proposal.description.contains("Due date: 2024-12-20"));
        assert_eq!(proposal.duration_minutes(), 60);
        assert_eq!(proposal.color, ColorTag::Red);
    }
}
