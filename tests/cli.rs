use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use chrono::Utc;

fn write_snapshot(dir: &Path) -> std::path::PathBuf {
    let now = Utc::now().to_rfc3339();
    let sessions = serde_json::json!([
        { "sessionId": "1", "title": "Fix login bug", "dateCreated": now },
        { "sessionId": "2", "title": "Refactor auth", "dateCreated": "garbage" },
    ]);
    let path = dir.join("sessions.json");
    fs::write(&path, serde_json::to_string(&sessions).unwrap()).unwrap();
    path
}

fn run(dir: &Path, args: &[&str]) -> Output {
    let config = dir.join("config.toml");
    fs::write(&config, "fuzzy_tolerance = 0.3\n").unwrap();
    Command::new(env!("CARGO_BIN_EXE_history-search"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("run history-search")
}

#[test]
fn prints_matching_sessions_under_group_headers() {
    let dir = tempfile::TempDir::new().unwrap();
    let snapshot = write_snapshot(dir.path());
    let output = run(dir.path(), &["--sessions", snapshot.to_str().unwrap(), "login"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Today\n"), "{stdout}");
    assert!(stdout.contains("Fix login bug"));
    assert!(!stdout.contains("Refactor auth"));
}

#[test]
fn json_output_lists_all_groups_for_empty_query() {
    let dir = tempfile::TempDir::new().unwrap();
    let snapshot = write_snapshot(dir.path());
    let output = run(dir.path(), &["--sessions", snapshot.to_str().unwrap(), "--json"]);

    assert!(output.status.success());
    let groups: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let groups = groups.as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["label"], "Today");
    assert_eq!(groups[0]["sessions"][0]["sessionId"], "1");
    assert_eq!(groups[1]["label"], "Older");
    assert_eq!(groups[1]["sessions"][0]["sessionId"], "2");
}

#[test]
fn missing_snapshot_is_an_empty_history() {
    let dir = tempfile::TempDir::new().unwrap();
    let missing = dir.path().join("nope.json");
    let output = run(dir.path(), &["--sessions", missing.to_str().unwrap()]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No sessions found."));
}

#[test]
fn malformed_snapshot_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let snapshot = dir.path().join("sessions.json");
    fs::write(&snapshot, "{ not json").unwrap();
    let output = run(dir.path(), &["--sessions", snapshot.to_str().unwrap()]);

    assert!(!output.status.success());
}

#[test]
fn invalid_config_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let snapshot = write_snapshot(dir.path());
    let config = dir.path().join("bad.toml");
    fs::write(&config, "fuzzy_tolerance = 4.0\n").unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_history-search"))
        .arg("--config")
        .arg(&config)
        .arg("--sessions")
        .arg(&snapshot)
        .output()
        .expect("run history-search");

    assert!(!output.status.success());
}
