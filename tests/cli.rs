//! Integration tests for top-level CLI behavior.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::json;

fn run_lmseval(args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_lmseval");
    Command::new(bin)
        .args(args)
        .env_remove("LMSEVAL_TIMEZONE")
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run lmseval binary")
}

/// Writes a small benchmark run: one Side-effect and one Information Seeking task.
fn fixture(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lmseval_cli_{name}"));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(dir.join("logs")).unwrap();
    fs::create_dir_all(dir.join("results/task_count-1")).unwrap();

    let tasks = json!([
        {"id": "page", "type": "Side-effect", "instances": [
            {"id": "page-1", "instance_text": "Create a page titled Syllabus.", "answer_key": [
                {"method": "POST", "path": "/api/v1/courses/5/pages", "request_kv": {"title": "Syllabus"}}
            ]}
        ]},
        {"id": "count", "type": "Information Seeking", "answer_type": "Numeric", "instances": [
            {"id": "count-1", "instance_text": "How many modules are there?", "answer_key": {"Numeric": 4}},
            {"id": "count-2", "instance_text": "How many pages are there?", "answer_key": {"Numeric": 9}}
        ]}
    ]);
    let capture = json!([
        {"method": "Network.requestWillBeSent", "params": {"request": {
            "method": "GET",
            "url": "http://localhost:8088/courses/5"
        }}},
        {"method": "Network.requestWillBeSent", "params": {"request": {
            "method": "POST",
            "url": "http://localhost:8088/api/v1/courses/5/pages",
            "headers": {"Content-Type": "application/json"},
            "postData": "{\"wiki_page\": {\"title\": \"Syllabus\", \"body\": \"\"}}"
        }}}
    ]);
    let transcript = json!([
        {"role": "user", "content": "How many modules are there?"},
        {"role": "assistant", "content": "I found four modules.\nAnswer: 4"}
    ]);
    fs::write(dir.join("tasks.json"), tasks.to_string()).unwrap();
    fs::write(dir.join("logs/network_page-1.json"), capture.to_string()).unwrap();
    fs::write(dir.join("results/task_count-1/interact_messages.json"), transcript.to_string()).unwrap();
    dir
}

fn path(dir: &Path, rel: &str) -> String {
    dir.join(rel).to_string_lossy().into_owned()
}

#[test]
fn evaluate_prints_json_report() {
    let dir = fixture("evaluate_json");
    let output = run_lmseval(&[
        "evaluate",
        "--tasks",
        &path(&dir, "tasks.json"),
        "--wv-network-logs",
        &path(&dir, "logs"),
        "--wv-interact-messages",
        &path(&dir, "results"),
        "--format",
        "json",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["correct"], 2);
    assert_eq!(report["incorrect"], 0);
    assert_eq!(report["percentage"], 100.0);
    assert_eq!(report["timezone"], "America/Edmonton");
    assert_eq!(report["unevaluated"], json!(["count-2"]));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Task Instances: 3"));
    assert!(stderr.contains("2 correct"));
}

#[test]
fn evaluate_writes_yaml_report_file() {
    let dir = fixture("evaluate_yaml");
    let report_path = path(&dir, "out/report.yaml");
    let output = run_lmseval(&[
        "evaluate",
        "-t",
        &path(&dir, "tasks.json"),
        "--wv-interact-messages",
        &path(&dir, "results"),
        "--output",
        &report_path,
    ]);
    assert!(output.status.success());
    let written = fs::read_to_string(&report_path).unwrap();
    assert!(written.contains("correct: 1"));
    assert!(written.contains("kind: information_seeking"));
}

#[test]
fn status_counts_artifacts() {
    let dir = fixture("status");
    let output = run_lmseval(&[
        "status",
        "--tasks",
        &path(&dir, "tasks.json"),
        "--wv-network-logs",
        &path(&dir, "logs"),
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Tasks: 2"));
    assert!(stdout.contains("Network Logs: 1"));
    assert!(stdout.contains("Outputs: 0"));
}

#[test]
fn export_webvoyager_task_list() {
    let dir = fixture("export");
    let output = run_lmseval(&[
        "export",
        "--tasks",
        &path(&dir, "tasks.json"),
        "--target",
        "webvoyager",
        "--username",
        "sam@example.edu",
        "--password",
        "secret",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<serde_json::Value> =
        stdout.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["id"], "page-1");
    assert!(lines[1]["ques"].as_str().unwrap().ends_with("Answer: [Number]"));
}

#[test]
fn invalid_timezone_exits_with_error() {
    let dir = fixture("bad_tz");
    let output = run_lmseval(&[
        "evaluate",
        "--tasks",
        &path(&dir, "tasks.json"),
        "--timezone",
        "Atlantis/Capital",
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("Atlantis/Capital"));
}

#[test]
fn invalid_subcommand_exits_with_error() {
    let output = run_lmseval(&["nonsense"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));
}
