//! Google Calendar sink (Calendar API v3 `events.insert`).

use reqwest::blocking::Client;
use serde_json::json;

use super::traits::CalendarSink;
use crate::error::SinkError;
use crate::followup::{ColorTag, EventProposal};

pub const DEFAULT_CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";

/// Google's event palette ids for our three colours.
fn color_id(color: ColorTag) -> &'static str {
    match color {
        ColorTag::Red => "11",
        ColorTag::Yellow => "5",
        ColorTag::Green => "10",
    }
}

pub struct GoogleCalendarSink {
    client: Client,
    base_url: String,
    access_token: String,
    calendar_id: String,
    time_zone: String,
}

impl GoogleCalendarSink {
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        calendar_id: impl Into<String>,
        time_zone: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            calendar_id: calendar_id.into(),
            time_zone: time_zone.into(),
        }
    }

    /// Request body for `events.insert`.
    pub fn event_body(&self, proposal: &EventProposal) -> serde_json::Value {
        let overrides: Vec<_> = proposal
            .reminders
            .iter()
            .map(|r| json!({ "method": r.channel.as_str(), "minutes": r.minutes_before }))
            .collect();

        json!({
            "summary": proposal.title,
            "description": proposal.description,
            "start": {
                "dateTime": proposal.start_time.format("%Y-%m-%dT%H:%M:%S").to_string(),
                "timeZone": self.time_zone,
            },
            "end": {
                "dateTime": proposal.end_time.format("%Y-%m-%dT%H:%M:%S").to_string(),
                "timeZone": self.time_zone,
            },
            "reminders": {
                "useDefault": false,
                "overrides": overrides,
            },
            "colorId": color_id(proposal.color),
        })
    }
}

impl CalendarSink for GoogleCalendarSink {
    fn create_event(&self, proposal: &EventProposal) -> Result<String, SinkError> {
        let url = format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(&self.calendar_id)
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&self.event_body(proposal))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Rejected {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let created: serde_json::Value = response
            .json()
            .map_err(|e| SinkError::InvalidResponse(e.to_string()))?;
        created["id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| SinkError::InvalidResponse("missing event id".to_string()))
    }
}
