//! # Followup Core Library
//!
//! This library turns action items found in recently changed documents into
//! calendar follow-ups. All operations are available via the standalone
//! `followup-cli` binary, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Follow-up scheduling**: due-date extraction, target-date derivation,
//!   slot allocation and duration heuristics, combined into an
//!   [`EventProposal`] per action item
//! - **Integrations**: document sources (local folder, Google Drive), an
//!   OpenAI-backed analyzer and calendar sinks (Google Calendar, dry run)
//! - **Scan pipeline**: one pass over changed documents, recorded in SQLite
//! - **Storage**: SQLite scan bookkeeping and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`FollowUpScheduler`]: plans and submits follow-ups for one run
//! - [`ScanRunner`]: fetch, analyze, schedule, record
//! - [`Database`]: processed documents and run history
//! - [`Config`]: application configuration management

pub mod action;
pub mod clock;
pub mod error;
pub mod followup;
pub mod integrations;
pub mod report;
pub mod scan;
pub mod storage;

pub use action::{ActionItem, Priority};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{AnalyzerError, ConfigError, CoreError, DatabaseError, SinkError, SourceError};
pub use followup::{
    Delivery, DueDate, EventProposal, FollowUpOutcome, FollowUpPlan, FollowUpScheduler,
};
pub use integrations::{CalendarSink, Credential, DocumentAnalyzer, DocumentSource};
pub use scan::{ScanReport, ScanRunner};
pub use storage::{Config, Database};
