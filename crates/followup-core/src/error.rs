//! Core error types for followup-core.
//!
//! Every collaborator (document source, analyzer, calendar sink) gets its
//! own error enum so callers can tell which stage of a scan failed. The
//! follow-up scheduler itself never returns any of these: sink failures
//! come back inside the per-item outcome instead.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for followup-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Document source errors
    #[error("Document source error: {0}")]
    Source(#[from] SourceError),

    /// Document analyzer errors
    #[error("Analyzer error: {0}")]
    Analyzer(#[from] AnalyzerError),

    /// Calendar sink errors
    #[error("Calendar error: {0}")]
    Sink(#[from] SinkError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Missing credential (API key or access token)
    #[error("Missing credential '{0}': run `followup-cli auth` or set the environment variable")]
    MissingCredential(String),
}

/// Errors raised while listing or downloading documents.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Local filesystem failure
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP transport failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote API answered with a non-success status
    #[error("Drive API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// Response did not have the expected shape
    #[error("Unexpected Drive response: {0}")]
    InvalidResponse(String),

    /// Missing credential
    #[error("Not authenticated with {0}")]
    NotAuthenticated(String),

    /// No Drive folder carries the configured name
    #[error("Drive folder not found: {0}")]
    FolderNotFound(String),
}

/// Errors raised by a document analyzer.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// HTTP transport failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The model endpoint answered with a non-success status
    #[error("Model API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// Response did not have the expected shape
    #[error("Unexpected model response: {0}")]
    InvalidResponse(String),

    /// Missing API key
    #[error("Analyzer API key not configured")]
    MissingApiKey,
}

/// Errors raised when persisting an event proposal.
#[derive(Error, Debug)]
pub enum SinkError {
    /// HTTP transport failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Calendar rejected the event
    #[error("Calendar rejected event ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// Response did not have the expected shape
    #[error("Unexpected calendar response: {0}")]
    InvalidResponse(String),

    /// Missing access token
    #[error("Not authenticated with {0}")]
    NotAuthenticated(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
