//! SQLite-based scan bookkeeping.
//!
//! Provides persistent storage for:
//! - Documents already processed (never analyzed twice)
//! - A rolling history of scan runs
//! - Key-value store for application state

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::DatabaseError;

/// Number of run rows kept; older rows are pruned on insert.
pub const RUN_HISTORY_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Partial,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Success => "success",
            RunStatus::Partial => "partial",
        }
    }

    fn parse(s: &str) -> Self {
        if s == "success" {
            RunStatus::Success
        } else {
            RunStatus::Partial
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// Row id; ignored by `record_run`.
    pub id: i64,
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub documents: u32,
    pub action_items: u32,
    pub events_created: u32,
    pub events_failed: u32,
    pub status: RunStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunSummary {
    pub total_runs: u64,
    pub average_duration_secs: f64,
    /// Fraction of runs with status `success`, 0.0 when there are none.
    pub success_rate: f64,
}

/// SQLite database for scan state.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/followup/followup.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        Self::open_at(&data_dir()?.join("followup.db"))
    }

    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS processed_documents (
                id           TEXT PRIMARY KEY,
                name         TEXT NOT NULL DEFAULT '',
                processed_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS runs (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                started_at     TEXT NOT NULL,
                duration_secs  REAL NOT NULL,
                documents      INTEGER NOT NULL,
                action_items   INTEGER NOT NULL,
                events_created INTEGER NOT NULL,
                events_failed  INTEGER NOT NULL,
                status         TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_runs_started_at ON runs(started_at);",
        )?;
        Ok(())
    }

    pub fn is_processed(&self, id: &str) -> Result<bool, DatabaseError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM processed_documents WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn mark_processed(&self, id: &str, name: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO processed_documents (id, name, processed_at)
             VALUES (?1, ?2, ?3)",
            params![id, name, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Record a finished scan and prune history beyond `RUN_HISTORY_LIMIT`.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_run(&self, run: &RunRecord) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO runs (started_at, duration_secs, documents, action_items,
                               events_created, events_failed, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                run.started_at.to_rfc3339(),
                run.duration_secs,
                run.documents,
                run.action_items,
                run.events_created,
                run.events_failed,
                run.status.as_str(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.conn.execute(
            "DELETE FROM runs WHERE id NOT IN
                (SELECT id FROM runs ORDER BY id DESC LIMIT ?1)",
            params![RUN_HISTORY_LIMIT],
        )?;
        Ok(id)
    }

    /// Most recent runs first.
    pub fn recent_runs(&self, limit: usize) -> Result<Vec<RunRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, started_at, duration_secs, documents, action_items,
                    events_created, events_failed, status
             FROM runs ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            let started_at: String = row.get(1)?;
            let status: String = row.get(7)?;
            Ok(RunRecord {
                id: row.get(0)?,
                started_at: DateTime::parse_from_rfc3339(&started_at)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_default(),
                duration_secs: row.get(2)?,
                documents: row.get(3)?,
                action_items: row.get(4)?,
                events_created: row.get(5)?,
                events_failed: row.get(6)?,
                status: RunStatus::parse(&status),
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn run_summary(&self) -> Result<RunSummary, DatabaseError> {
        let (total, avg, successes): (i64, Option<f64>, i64) = self.conn.query_row(
            "SELECT COUNT(*), AVG(duration_secs),
                    COALESCE(SUM(CASE WHEN status = 'success' THEN 1 ELSE 0 END), 0)
             FROM runs",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        if total == 0 {
            return Ok(RunSummary::default());
        }
        Ok(RunSummary {
            total_runs: total as u64,
            average_duration_secs: avg.unwrap_or(0.0),
            success_rate: successes as f64 / total as f64,
        })
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run(status: RunStatus, duration_secs: f64) -> RunRecord {
        RunRecord {
            id: 0,
            started_at: Utc::now(),
            duration_secs,
            documents: 2,
            action_items: 3,
            events_created: 3,
            events_failed: 0,
            status,
        }
    }

    #[test]
    fn processed_documents_are_remembered() {
        let db = Database::open_memory().unwrap();
        assert!(!db.is_processed("doc-1").unwrap());
        db.mark_processed("doc-1", "Notes").unwrap();
        db.mark_processed("doc-1", "Notes (renamed)").unwrap();
        assert!(db.is_processed("doc-1").unwrap());
        assert!(!db.is_processed("doc-2").unwrap());
    }

    #[test]
    fn record_and_query_runs() {
        let db = Database::open_memory().unwrap();
        db.record_run(&run(RunStatus::Success, 2.0)).unwrap();
        db.record_run(&run(RunStatus::Partial, 4.0)).unwrap();

        let runs = db.recent_runs(10).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].status, RunStatus::Partial);
        assert_eq!(runs[1].status, RunStatus::Success);

        let summary = db.run_summary().unwrap();
        assert_eq!(summary.total_runs, 2);
        assert!((summary.average_duration_secs - 3.0).abs() < 1e-9);
        assert!((summary.success_rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn run_history_is_capped() {
        let db = Database::open_memory().unwrap();
        for _ in 0..(RUN_HISTORY_LIMIT + 5) {
            db.record_run(&run(RunStatus::Success, 1.0)).unwrap();
        }
        assert_eq!(db.run_summary().unwrap().total_runs, RUN_HISTORY_LIMIT as u64);
        assert_eq!(db.recent_runs(3).unwrap().len(), 3);
    }

    #[test]
    fn empty_summary_is_zeroed() {
        let db = Database::open_memory().unwrap();
        let summary = db.run_summary().unwrap();
        assert_eq!(summary.total_runs, 0);
        assert_eq!(summary.success_rate, 0.0);
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
    }

    #[test]
    fn open_at_persists_across_connections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("followup.db");
        Database::open_at(&path).unwrap().mark_processed("a", "A").unwrap();
        assert!(Database::open_at(&path).unwrap().is_processed("a").unwrap());
    }
}
