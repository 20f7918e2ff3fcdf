//! Calendar sink that only records what would have been written.

use std::sync::Mutex;

use crate::error::SinkError;
use crate::followup::EventProposal;

use super::traits::CalendarSink;

#[derive(Debug, Default)]
pub struct DryRunSink {
    recorded: Mutex<Vec<EventProposal>>,
}

impl DryRunSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Proposals received so far, in submission order.
    pub fn recorded(&self) -> Vec<EventProposal> {
        self.recorded
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl CalendarSink for DryRunSink {
    fn create_event(&self, proposal: &EventProposal) -> Result<String, SinkError> {
        let id = format!("dry-run-{}", uuid::Uuid::new_v4());
        tracing::info!(
            event_id = %id,
            title = %proposal.title,
            start = %proposal.start_time,
            end = %proposal.end_time,
            "dry run: event not written"
        );
        if let Ok(mut guard) = self.recorded.lock() {
            guard.push(proposal.clone());
        }
        Ok(id)
    }
}
