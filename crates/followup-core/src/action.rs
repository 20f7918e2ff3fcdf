//! Action items and the priority tiers that drive scheduling policy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Priority tier assigned to a document by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Parse a model answer, falling back to `Medium` for anything that is
    /// not exactly one of the three tiers.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.trim()
            .trim_matches(|c: char| c == '.' || c == '"' || c == '\'')
            .parse()
            .unwrap_or(Priority::Medium)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(ConfigError::InvalidValue {
                key: "priority".to_string(),
                message: format!("expected high, medium or low, got '{other}'"),
            }),
        }
    }
}

/// A discrete follow-up extracted from a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub description: String,
    pub priority: Priority,
    /// Name of the document the item came from.
    pub source_document: String,
}

impl ActionItem {
    pub fn new(
        description: impl Into<String>,
        priority: Priority,
        source_document: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            priority,
            source_document: source_document.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("Medium".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!("low".parse::<Priority>().unwrap(), Priority::Low);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn lenient_parse_defaults_to_medium() {
        assert_eq!(Priority::parse_lenient(" high.\n"), Priority::High);
        assert_eq!(Priority::parse_lenient("\"low\""), Priority::Low);
        assert_eq!(Priority::parse_lenient("critical"), Priority::Medium);
        assert_eq!(Priority::parse_lenient(""), Priority::Medium);
    }

    #[test]
    fn priority_serializes_lowercase() {
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "\"high\"");
    }
}
