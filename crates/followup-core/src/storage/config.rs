//! TOML-based application configuration.
//!
//! Stores:
//! - Where documents come from (local folder or Google Drive)
//! - Analyzer endpoint and model names
//! - Target calendar and its time zone
//! - Scan cadence and report output
//!
//! Configuration is stored at `~/.config/followup/config.toml`.
//! Credentials are kept out of this file; see `integrations::keyring_store`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::integrations::google_calendar::DEFAULT_CALENDAR_API;
use crate::integrations::google_drive::DEFAULT_DRIVE_API;
use crate::integrations::openai::DEFAULT_OPENAI_API;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    Local,
    GoogleDrive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarKind {
    Google,
    #[default]
    DryRun,
}

/// Document source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,
    /// Local directory scanned when `kind = "local"`.
    #[serde(default = "default_folder")]
    pub folder: PathBuf,
    /// Drive folder id; absent means the whole drive.
    #[serde(default)]
    pub folder_id: Option<String>,
    /// Drive folder looked up by name when `folder_id` is unset.
    #[serde(default)]
    pub folder_name: Option<String>,
    #[serde(default = "default_true")]
    pub include_subfolders: bool,
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: u32,
    /// Documents whose trimmed content is not longer than this are skipped.
    #[serde(default = "default_min_content_chars")]
    pub min_content_chars: usize,
    #[serde(default = "default_drive_url")]
    pub base_url: String,
}

/// Analyzer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default = "default_openai_url")]
    pub base_url: String,
    #[serde(default = "default_summary_model")]
    pub summary_model: String,
    #[serde(default = "default_priority_model")]
    pub priority_model: String,
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
}

/// Calendar configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default)]
    pub kind: CalendarKind,
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default = "default_calendar_url")]
    pub base_url: String,
}

/// Scan scheduling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_interval_hours")]
    pub interval_hours: u32,
    /// Directory for markdown run summaries. Not written when absent.
    #[serde(default)]
    pub report_dir: Option<PathBuf>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/followup/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default tracing filter; `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub scan: ScanConfig,
}

// Default functions
fn default_true() -> bool {
    true
}
fn default_folder() -> PathBuf {
    PathBuf::from(".")
}
fn default_lookback_hours() -> u32 {
    168
}
fn default_min_content_chars() -> usize {
    50
}
fn default_drive_url() -> String {
    DEFAULT_DRIVE_API.into()
}
fn default_openai_url() -> String {
    DEFAULT_OPENAI_API.into()
}
fn default_summary_model() -> String {
    "gpt-4".into()
}
fn default_priority_model() -> String {
    "gpt-3.5-turbo".into()
}
fn default_max_content_chars() -> usize {
    4000
}
fn default_calendar_id() -> String {
    "primary".into()
}
fn default_time_zone() -> String {
    "America/New_York".into()
}
fn default_calendar_url() -> String {
    DEFAULT_CALENDAR_API.into()
}
fn default_interval_hours() -> u32 {
    168
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            folder: default_folder(),
            folder_id: None,
            folder_name: None,
            include_subfolders: true,
            lookback_hours: default_lookback_hours(),
            min_content_chars: default_min_content_chars(),
            base_url: default_drive_url(),
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_url(),
            summary_model: default_summary_model(),
            priority_model: default_priority_model(),
            max_content_chars: default_max_content_chars(),
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            kind: CalendarKind::default(),
            calendar_id: default_calendar_id(),
            time_zone: default_time_zone(),
            base_url: default_calendar_url(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            interval_hours: default_interval_hours(),
            report_dir: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            source: SourceConfig::default(),
            analyzer: AnalyzerConfig::default(),
            calendar: CalendarConfig::default(),
            scan: ScanConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        if key.is_empty() {
            return Err(unknown());
        }

        let mut parts = key.split('.').peekable();
        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there when missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value in memory by dot-separated key.
    ///
    /// Optional fields currently unset accept any string. Enum fields are
    /// validated when the result is deserialized back.
    pub fn update(&mut self, key: &str, value: &str) -> std::result::Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key and persist. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.update(key, value)?;
        self.save()
    }

    /// Every leaf key with its current value, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (k, v) in map {
                        let key = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&key, v, out);
                    }
                }
                serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out.sort();
        out
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.source.kind, SourceKind::Local);
        assert_eq!(parsed.calendar.kind, CalendarKind::DryRun);
        assert_eq!(parsed.source.lookback_hours, 168);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [calendar]
            kind = "google"
            calendar_id = "team@example.com"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.calendar.kind, CalendarKind::Google);
        assert_eq!(parsed.calendar.calendar_id, "team@example.com");
        assert_eq!(parsed.calendar.time_zone, "America/New_York");
        assert_eq!(parsed.analyzer.summary_model, "gpt-4");
        assert_eq!(parsed.log_level, "info");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("calendar.time_zone").as_deref(), Some("America/New_York"));
        assert_eq!(cfg.get("source.min_content_chars").as_deref(), Some("50"));
        assert_eq!(cfg.get("source.include_subfolders").as_deref(), Some("true"));
        assert!(cfg.get("calendar.missing_key").is_none());
    }

    #[test]
    fn set_json_value_by_path_updates_nested_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "analyzer.max_content_chars", "2000").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "analyzer.max_content_chars").unwrap(),
            &serde_json::Value::Number(2000.into())
        );
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let err = Config::set_json_value_by_path(&mut json, "calendar.nonexistent", "x").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));
    }

    #[test]
    fn set_json_value_by_path_rejects_invalid_type() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let err =
            Config::set_json_value_by_path(&mut json, "source.include_subfolders", "maybe").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn update_validates_enum_values() {
        let mut cfg = Config::default();
        cfg.update("source.kind", "google_drive").unwrap();
        assert_eq!(cfg.source.kind, SourceKind::GoogleDrive);

        let err = cfg.update("calendar.kind", "outlook").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert_eq!(cfg.calendar.kind, CalendarKind::DryRun);
    }

    #[test]
    fn update_fills_optional_fields() {
        let mut cfg = Config::default();
        assert_eq!(cfg.get("source.folder_id").as_deref(), Some("null"));
        cfg.update("source.folder_id", "abc123").unwrap();
        assert_eq!(cfg.source.folder_id.as_deref(), Some("abc123"));
        cfg.update("source.folder_name", "Meeting Notes").unwrap();
        assert_eq!(cfg.source.folder_name.as_deref(), Some("Meeting Notes"));
    }

    #[test]
    fn entries_lists_every_leaf() {
        let entries = Config::default().entries();
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"log_level"));
        assert!(keys.contains(&"calendar.calendar_id"));
        assert!(keys.contains(&"scan.interval_hours"));
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.scan.interval_hours, 168);

        let mut changed = cfg.clone();
        changed.update("scan.interval_hours", "24").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().scan.interval_hours, 24);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "source = [not toml").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to load configuration"));
    }

    #[test]
    fn load_from_does_not_overwrite_unreadable_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::create_dir(&path).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err,
            crate::error::CoreError::Config(ConfigError::LoadFailed { .. })
        ));
        assert!(path.is_dir());
    }
}
