//! Scan pipeline against a temp folder, a mocked model endpoint and the
//! dry-run calendar.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use followup_core::integrations::{DryRunSink, LocalFolderSource, OpenAiAnalyzer};
use followup_core::storage::RunStatus;
use followup_core::{Database, FixedClock, Priority, ScanRunner};
use mockito::Matcher;
use serde_json::json;
use tempfile::TempDir;

fn completion(content: &str) -> String {
    json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] }).to_string()
}

#[test]
fn scan_analyzes_schedules_and_records() {
    let docs = TempDir::new().unwrap();
    std::fs::write(
        docs.path().join("board.md"),
        "Board meeting minutes. The final report is due before the holidays and \
         the committee expects a draft early.",
    )
    .unwrap();
    std::fs::write(docs.path().join("stub.txt"), "hello").unwrap();

    let mut server = mockito::Server::new();
    let _summary = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("concise summary".into()))
        .with_status(200)
        .with_body(completion("The board wants the final report."))
        .create();
    let _items = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("Action items".into()))
        .with_status(200)
        .with_body(completion(
            "```json\n{\"action_items\": [\"Submit final report by December 20th, 2024\", \"Book a review session\"], \"follow_ups\": [\"Confirm draft received\"]}\n```",
        ))
        .create();
    let _priority = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("assess the priority".into()))
        .with_status(200)
        .with_body(completion("high"))
        .create();

    let state = TempDir::new().unwrap();
    let db = Database::open_at(&state.path().join("followup.db")).unwrap();
    let now = NaiveDate::from_ymd_opt(2024, 12, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let runner = ScanRunner::new(
        Box::new(LocalFolderSource::new(docs.path(), true)),
        Box::new(OpenAiAnalyzer::new(server.url(), "sk-test")),
        Box::new(DryRunSink::new()),
        db,
        Arc::new(FixedClock(now)),
    )
    .with_lookback(Duration::hours(1));

    let report = runner.run().unwrap();

    assert_eq!(report.documents.len(), 1);
    assert_eq!(report.documents[0].priority, Priority::High);
    assert_eq!(report.documents[0].follow_ups, vec!["Confirm draft received"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "stub.txt");
    assert_eq!(report.status(), RunStatus::Success);

    assert_eq!(report.outcomes.len(), 2);
    let first = &report.outcomes[0].plan.proposal;
    assert_eq!(first.start_time.to_string(), "2024-12-19 09:00:00");
    // Undated high item: Dec 2, the 9:00 band hour.
    let second = &report.outcomes[1].plan.proposal;
    assert_eq!(second.start_time.to_string(), "2024-12-02 09:00:00");
    assert_eq!(second.duration_minutes(), 120);
    assert!(report
        .outcomes
        .iter()
        .all(|o| o.delivery.is_created()));

    let md = report.to_markdown();
    assert!(md.contains("- Submit final report by December 20th, 2024 (from board.md)"));

    let db = runner.database();
    assert!(db.is_processed("board.md").unwrap());
    assert!(db.is_processed("stub.txt").unwrap());
    let runs = db.recent_runs(1).unwrap();
    assert_eq!(runs[0].events_created, 2);
    assert_eq!(runs[0].documents, 1);

    // Nothing new on a second pass.
    let again = runner.run().unwrap();
    assert!(again.documents.is_empty());
    assert!(again.outcomes.is_empty());
}

#[test]
fn missing_api_key_leaves_document_for_retry() {
    let docs = TempDir::new().unwrap();
    std::fs::write(
        docs.path().join("notes.txt"),
        "Plenty of text here to get past the minimum content length threshold.",
    )
    .unwrap();

    let now = NaiveDate::from_ymd_opt(2025, 1, 6)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let runner = ScanRunner::new(
        Box::new(LocalFolderSource::new(docs.path(), false)),
        Box::new(OpenAiAnalyzer::new("http://127.0.0.1:9", "")),
        Box::new(DryRunSink::new()),
        Database::open_memory().unwrap(),
        Arc::new(FixedClock(now)),
    )
    .with_lookback(Duration::hours(1));

    let report = runner.run().unwrap();
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.status(), RunStatus::Partial);
    assert!(!runner.database().is_processed("notes.txt").unwrap());
}
