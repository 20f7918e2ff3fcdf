//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. They run
//! against the development data directory.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "followup-cli", "--"])
        .args(args)
        .env("FOLLOWUP_ENV", "dev")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_plan_with_deadline() {
    let (stdout, _, code) = run_cli(&[
        "plan",
        "Submit final report by December 20th, 2024",
        "--priority",
        "high",
        "--now",
        "2024-12-01T00:00",
    ]);
    assert_eq!(code, 0, "plan failed");
    assert!(stdout.contains("Thu 2024-12-19 09:00 - 10:00 (60 min)"));
    assert!(stdout.contains("Due:      2024-12-20"));
    assert!(stdout.contains("email 1440m, popup 15m"));
}

#[test]
fn test_plan_json() {
    let (stdout, _, code) = run_cli(&[
        "plan",
        "Review budget",
        "--now",
        "2025-01-06T00:00",
        "--json",
    ]);
    assert_eq!(code, 0, "plan --json failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["proposal"]["start_time"], "2025-01-08T13:00:00");
    assert_eq!(parsed["proposal"]["end_time"], "2025-01-08T14:00:00");
    assert_eq!(parsed["due_date"]["status"], "not_found");
}

#[test]
fn test_plan_rejects_unknown_priority() {
    let (_, _, code) = run_cli(&["plan", "Anything", "--priority", "urgent"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_get() {
    let (stdout, _, code) = run_cli(&["config", "get", "calendar.calendar_id"]);
    assert_eq!(code, 0, "config get failed");
    assert!(!stdout.trim().is_empty());
}

#[test]
fn test_config_get_unknown_key() {
    let (_, stderr, code) = run_cli(&["config", "get", "calendar.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error: unknown config key: calendar.nope"));
}

#[test]
fn test_config_set_rejects_bad_value() {
    let (_, stderr, code) = run_cli(&["config", "set", "source.include_subfolders", "maybe"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_list() {
    let (stdout, _, code) = run_cli(&["config", "list"]);
    assert_eq!(code, 0, "config list failed");
    assert!(stdout.contains("calendar.time_zone = "));
}

#[test]
fn test_stats() {
    let (_, _, code) = run_cli(&["stats", "--limit", "3"]);
    assert_eq!(code, 0, "stats failed");
}
