mod config;
pub mod database;

pub use config::{AnalyzerConfig, CalendarConfig, CalendarKind, Config, ScanConfig, SourceConfig, SourceKind};
pub use database::{Database, RunRecord, RunStatus, RunSummary};

use std::path::PathBuf;

use crate::error::DatabaseError;

/// Returns `~/.config/followup[-dev]/` based on FOLLOWUP_ENV.
///
/// Set FOLLOWUP_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, DatabaseError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOLLOWUP_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("followup-dev")
    } else {
        base_dir.join("followup")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| DatabaseError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
