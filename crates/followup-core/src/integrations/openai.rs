//! Document analyzer backed by an OpenAI-compatible chat-completions API.
//!
//! Three prompts per document: a summary, a JSON list of action items and
//! follow-ups, and a one-word priority. Each call degrades independently;
//! only a missing API key fails the whole analysis.

use indoc::formatdoc;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

use super::traits::{Document, DocumentAnalysis, DocumentAnalyzer};
use crate::action::Priority;
use crate::error::AnalyzerError;

pub const DEFAULT_OPENAI_API: &str = "https://api.openai.com/v1";
pub const SUMMARY_FAILED: &str = "Summary generation failed";

/// Action items and follow-ups as returned by the extraction prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExtractedItems {
    #[serde(default)]
    pub action_items: Vec<String>,
    #[serde(default)]
    pub follow_ups: Vec<String>,
}

pub struct OpenAiAnalyzer {
    client: Client,
    base_url: String,
    api_key: String,
    summary_model: String,
    priority_model: String,
    max_content_chars: usize,
}

fn head(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

/// Parse the extraction answer, tolerating a surrounding code fence or
/// prose around the JSON object.
pub fn parse_extracted_items(raw: &str) -> Option<ExtractedItems> {
    let trimmed = raw.trim();
    if let Ok(items) = serde_json::from_str(trimmed) {
        return Some(items);
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&trimmed[start..=end]).ok()
}

impl OpenAiAnalyzer {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            summary_model: "gpt-4".to_string(),
            priority_model: "gpt-3.5-turbo".to_string(),
            max_content_chars: 4000,
        }
    }

    pub fn with_models(mut self, summary_model: impl Into<String>, priority_model: impl Into<String>) -> Self {
        self.summary_model = summary_model.into();
        self.priority_model = priority_model.into();
        self
    }

    pub fn with_max_content_chars(mut self, max_content_chars: usize) -> Self {
        self.max_content_chars = max_content_chars;
        self
    }

    fn complete(
        &self,
        model: &str,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, AnalyzerError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": model,
                "messages": [{ "role": "user", "content": prompt }],
                "max_tokens": max_tokens,
                "temperature": temperature,
            }))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalyzerError::Api {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let body: serde_json::Value = response
            .json()
            .map_err(|e| AnalyzerError::InvalidResponse(e.to_string()))?;
        body["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| AnalyzerError::InvalidResponse("missing message content".to_string()))
    }

    pub fn summarize(&self, content: &str) -> Result<String, AnalyzerError> {
        let prompt = formatdoc! {"
            Please provide a concise summary of the following document content.
            Focus on key points, decisions, and important information:

            {content}",
            content = head(content, self.max_content_chars),
        };
        self.complete(&self.summary_model, &prompt, 200, 0.3)
    }

    pub fn extract_action_items(&self, content: &str) -> Result<ExtractedItems, AnalyzerError> {
        let prompt = formatdoc! {"
            Analyze the following document and extract:
            1. Action items (specific tasks that need to be completed)
            2. Follow-ups (items that need monitoring or future attention)

            Format your response as JSON with keys 'action_items' and 'follow_ups',
            each containing a list of strings.

            Document content:
            {content}",
            content = head(content, self.max_content_chars),
        };
        let raw = self.complete(&self.summary_model, &prompt, 300, 0.2)?;
        Ok(parse_extracted_items(&raw).unwrap_or_else(|| {
            tracing::warn!("action-item answer was not JSON; treating as empty");
            ExtractedItems::default()
        }))
    }

    pub fn assess_priority(&self, content: &str, summary: &str) -> Result<Priority, AnalyzerError> {
        let prompt = formatdoc! {"
            Based on the document content and summary below, assess the priority level.
            Respond with only one word: 'high', 'medium', or 'low'

            Consider factors like:
            - Deadlines mentioned
            - Urgency indicators
            - Decision requirements
            - Stakeholder importance

            Summary: {summary}
            Content: {content}",
            content = head(content, self.max_content_chars / 2),
        };
        let raw = self.complete(&self.priority_model, &prompt, 10, 0.1)?;
        Ok(Priority::parse_lenient(&raw))
    }
}

impl DocumentAnalyzer for OpenAiAnalyzer {
    fn analyze(&self, document: &Document) -> Result<DocumentAnalysis, AnalyzerError> {
        if self.api_key.trim().is_empty() {
            return Err(AnalyzerError::MissingApiKey);
        }

        let summary = self.summarize(&document.content).unwrap_or_else(|e| {
            tracing::warn!(document = %document.name, error = %e, "summary failed");
            SUMMARY_FAILED.to_string()
        });
        let items = self
            .extract_action_items(&document.content)
            .unwrap_or_else(|e| {
                tracing::warn!(document = %document.name, error = %e, "action-item extraction failed");
                ExtractedItems::default()
            });
        let priority = self
            .assess_priority(&document.content, &summary)
            .unwrap_or_else(|e| {
                tracing::warn!(document = %document.name, error = %e, "priority assessment failed");
                Priority::Medium
            });

        Ok(DocumentAnalysis {
            summary,
            action_items: items.action_items,
            follow_ups: items.follow_ups,
            priority,
        })
    }
}
