use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::action::Priority;
use crate::error::{AnalyzerError, SinkError, SourceError};
use crate::followup::EventProposal;

/// A changed document with its text content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub modified_time: DateTime<Utc>,
    pub content: String,
}

/// What the analyzer made of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub summary: String,
    pub action_items: Vec<String>,
    pub follow_ups: Vec<String>,
    pub priority: Priority,
}

/// Yields documents modified within a lookback window.
pub trait DocumentSource: Send + Sync {
    /// Short identifier used in logs (e.g. "local", "google_drive").
    fn name(&self) -> &str;

    fn changed_documents(&self, lookback: Duration) -> Result<Vec<Document>, SourceError>;
}

/// Turns raw document content into a summary, action items and a priority.
pub trait DocumentAnalyzer: Send + Sync {
    fn analyze(&self, document: &Document) -> Result<DocumentAnalysis, AnalyzerError>;
}

/// Persists a finalized event proposal, returning the calendar's event id.
pub trait CalendarSink: Send + Sync {
    fn create_event(&self, proposal: &EventProposal) -> Result<String, SinkError>;
}
