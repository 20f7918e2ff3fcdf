//! One pass over changed documents: fetch, analyze, schedule, record.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::action::{ActionItem, Priority};
use crate::clock::Clock;
use crate::error::{ConfigError, Result};
use crate::followup::{FollowUpOutcome, FollowUpScheduler};
use crate::integrations::{
    CalendarSink, Credential, DocumentAnalyzer, DocumentSource, DryRunSink, GoogleCalendarSink,
    GoogleDriveSource, LocalFolderSource, OpenAiAnalyzer,
};
use crate::storage::{CalendarKind, Config, Database, RunRecord, RunStatus, SourceKind};

/// A document that made it through analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedDocument {
    pub id: String,
    pub name: String,
    pub summary: String,
    pub action_items: Vec<String>,
    pub follow_ups: Vec<String>,
    pub priority: Priority,
}

/// A document left out of analysis, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentNote {
    pub id: String,
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub source: String,
    pub documents: Vec<AnalyzedDocument>,
    pub outcomes: Vec<FollowUpOutcome>,
    /// Too short to analyze; marked processed anyway.
    pub skipped: Vec<DocumentNote>,
    /// Analysis failed; retried on the next run.
    pub failed: Vec<DocumentNote>,
}

impl ScanReport {
    pub fn action_item_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn events_created(&self) -> usize {
        self.outcomes.iter().filter(|o| o.delivery.is_created()).count()
    }

    pub fn events_failed(&self) -> usize {
        self.outcomes.len() - self.events_created()
    }

    pub fn status(&self) -> RunStatus {
        if self.failed.is_empty() && self.events_failed() == 0 {
            RunStatus::Success
        } else {
            RunStatus::Partial
        }
    }

    pub fn to_record(&self) -> RunRecord {
        RunRecord {
            id: 0,
            started_at: self.started_at,
            duration_secs: self.duration_secs,
            documents: self.documents.len() as u32,
            action_items: self.action_item_count() as u32,
            events_created: self.events_created() as u32,
            events_failed: self.events_failed() as u32,
            status: self.status(),
        }
    }
}

pub struct ScanRunner {
    source: Box<dyn DocumentSource>,
    analyzer: Box<dyn DocumentAnalyzer>,
    sink: Box<dyn CalendarSink>,
    db: Database,
    clock: Arc<dyn Clock>,
    lookback: Duration,
    min_content_chars: usize,
}

impl ScanRunner {
    pub fn new(
        source: Box<dyn DocumentSource>,
        analyzer: Box<dyn DocumentAnalyzer>,
        sink: Box<dyn CalendarSink>,
        db: Database,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            analyzer,
            sink,
            db,
            clock,
            lookback: Duration::hours(168),
            min_content_chars: 50,
        }
    }

    pub fn with_lookback(mut self, lookback: Duration) -> Self {
        self.lookback = lookback;
        self
    }

    pub fn with_min_content_chars(mut self, min_content_chars: usize) -> Self {
        self.min_content_chars = min_content_chars;
        self
    }

    /// Build every collaborator from configuration.
    ///
    /// `dry_run` forces the in-memory sink whatever `calendar.kind` says.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingCredential` when a required API key or
    /// access token cannot be resolved.
    pub fn from_config(
        config: &Config,
        db: Database,
        clock: Arc<dyn Clock>,
        dry_run: bool,
    ) -> Result<Self> {
        let source: Box<dyn DocumentSource> = match config.source.kind {
            SourceKind::Local => Box::new(LocalFolderSource::new(
                config.source.folder.clone(),
                config.source.include_subfolders,
            )),
            SourceKind::GoogleDrive => Box::new(drive_source(config)?),
        };

        let analyzer = OpenAiAnalyzer::new(
            config.analyzer.base_url.clone(),
            require(Credential::OpenAiApiKey)?,
        )
        .with_models(
            config.analyzer.summary_model.clone(),
            config.analyzer.priority_model.clone(),
        )
        .with_max_content_chars(config.analyzer.max_content_chars);

        let sink: Box<dyn CalendarSink> = match (dry_run, config.calendar.kind) {
            (false, CalendarKind::Google) => Box::new(GoogleCalendarSink::new(
                config.calendar.base_url.clone(),
                require(Credential::GoogleAccessToken)?,
                config.calendar.calendar_id.clone(),
                config.calendar.time_zone.clone(),
            )),
            _ => Box::new(DryRunSink::new()),
        };

        Ok(Self::new(source, Box::new(analyzer), sink, db, clock)
            .with_lookback(Duration::hours(i64::from(config.source.lookback_hours)))
            .with_min_content_chars(config.source.min_content_chars))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Run one scan.
    ///
    /// # Errors
    /// Fails when the source cannot list documents or the database cannot
    /// be read or written. Per-document and per-event failures are carried
    /// in the report instead.
    pub fn run(&self) -> Result<ScanReport> {
        let started_at = Utc::now();
        let timer = Instant::now();
        tracing::info!(source = self.source.name(), "scan started");

        let changed = self.source.changed_documents(self.lookback)?;

        let mut documents = Vec::new();
        let mut skipped = Vec::new();
        let mut failed = Vec::new();
        let mut items = Vec::new();

        for doc in changed {
            if self.db.is_processed(&doc.id)? {
                continue;
            }

            if doc.content.trim().chars().count() <= self.min_content_chars {
                tracing::debug!(document = %doc.name, "content too short; skipping");
                self.db.mark_processed(&doc.id, &doc.name)?;
                skipped.push(DocumentNote {
                    id: doc.id,
                    name: doc.name,
                    reason: "content too short".to_string(),
                });
                continue;
            }

            let analysis = match self.analyzer.analyze(&doc) {
                Ok(analysis) => analysis,
                Err(e) => {
                    tracing::error!(document = %doc.name, error = %e, "analysis failed");
                    failed.push(DocumentNote {
                        id: doc.id,
                        name: doc.name,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            tracing::info!(
                document = %doc.name,
                priority = %analysis.priority,
                action_items = analysis.action_items.len(),
                "document analyzed"
            );
            items.extend(
                analysis
                    .action_items
                    .iter()
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(|s| ActionItem::new(s, analysis.priority, doc.name.clone())),
            );
            self.db.mark_processed(&doc.id, &doc.name)?;
            documents.push(AnalyzedDocument {
                id: doc.id,
                name: doc.name,
                summary: analysis.summary,
                action_items: analysis.action_items,
                follow_ups: analysis.follow_ups,
                priority: analysis.priority,
            });
        }

        let mut scheduler = FollowUpScheduler::new(self.clock.clone());
        let outcomes = scheduler.schedule_all(&items, self.sink.as_ref());

        let report = ScanReport {
            started_at,
            duration_secs: timer.elapsed().as_secs_f64(),
            source: self.source.name().to_string(),
            documents,
            outcomes,
            skipped,
            failed,
        };

        self.db.record_run(&report.to_record())?;
        self.db.kv_set("last_run", &started_at.to_rfc3339())?;
        tracing::info!(
            documents = report.documents.len(),
            events_created = report.events_created(),
            events_failed = report.events_failed(),
            status = report.status().as_str(),
            "scan finished"
        );
        Ok(report)
    }
}

/// Drive source described by `config.source`, authenticated with the
/// stored Google access token.
pub fn drive_source(config: &Config) -> Result<GoogleDriveSource> {
    Ok(GoogleDriveSource::new(
        config.source.base_url.clone(),
        require(Credential::GoogleAccessToken)?,
        config.source.folder_id.clone(),
        config.source.include_subfolders,
    )
    .with_folder_name(config.source.folder_name.clone()))
}

fn require(credential: Credential) -> Result<String> {
    credential
        .resolve()
        .ok_or_else(|| ConfigError::MissingCredential(credential.keyring_key().to_string()).into())
}
