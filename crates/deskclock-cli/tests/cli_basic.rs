//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. Each test
//! points DESKCLOCK_DATA_DIR at its own temp directory.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "deskclock-cli", "--"])
        .args(args)
        .env("DESKCLOCK_ENV", "dev")
        .env("DESKCLOCK_DATA_DIR", data_dir)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("stdout is JSON")
}

#[test]
fn test_timer_status_defaults_to_idle() {
    let dir = tempfile::tempdir().unwrap();
    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["type"], "StateSnapshot");
    assert_eq!(status["phase"], "idle");
    assert_eq!(status["duration_ms"], 25 * 60_000);
}

#[test]
fn test_timer_configure_rounds_to_step() {
    let dir = tempfile::tempdir().unwrap();
    let configured = run_json(dir.path(), &["timer", "configure", "0.51"]);
    assert_eq!(configured["type"], "Configured");
    assert_eq!(configured["duration_ms"], 30_000);
}

#[test]
fn test_timer_start_pause_stop_logs_history() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["timer", "configure", "5"]);

    let started = run_json(dir.path(), &["timer", "start"]);
    assert_eq!(started["type"], "TimerStarted");

    let paused = run_json(dir.path(), &["timer", "pause"]);
    assert_eq!(paused["type"], "TimerPaused");

    let stopped = run_json(dir.path(), &["timer", "stop"]);
    assert_eq!(stopped["type"], "TimerStopped");
    assert_eq!(stopped["outcome"]["completed_naturally"], false);

    let records = run_json(dir.path(), &["history", "list", "--json"]);
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["isCompleted"], false);
}

#[test]
fn test_pause_when_idle_prints_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_json(dir.path(), &["timer", "pause"]);
    assert_eq!(out["type"], "StateSnapshot");
}

#[test]
fn test_history_note_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["timer", "configure", "1"]);
    run_json(dir.path(), &["timer", "start"]);
    run_json(dir.path(), &["timer", "stop"]);

    let records = run_json(dir.path(), &["history", "list", "--json"]);
    let id = records[0]["id"].as_str().unwrap().to_string();

    let noted = run_json(dir.path(), &["history", "note", &id, "  reading  "]);
    assert_eq!(noted["note"], "reading");

    let stats = run_json(dir.path(), &["history", "stats"]);
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["completed"], 0);

    let removed = run_json(dir.path(), &["history", "delete", &id]);
    assert_eq!(removed["id"], id.as_str());

    let (_, stderr, code) = run_cli(dir.path(), &["history", "delete", &id]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "drag.friction"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "0.94");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "clock.format", "h12"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "clock.format"]);
    assert_eq!(stdout.trim(), "h12");

    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "drag.nope", "1"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_config_rejects_negative_velocity_cap() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "drag.max_velocity", "-5"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("drag.max_velocity"), "{stderr}");

    let (stdout, stderr, code) = run_cli(dir.path(), &["drag", "simulate", "--vx", "10", "--vy", "0"]);
    assert_eq!(code, 0, "{stderr}");
    assert!(stdout.lines().last().unwrap().contains("resting"));
}

#[test]
fn test_drag_simulate_settles() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli(
        dir.path(),
        &["drag", "simulate", "--vx", "30", "--vy", "-10", "--half-width", "200"],
    );
    assert_eq!(code, 0, "{stderr}");
    let frames: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(frames[0]["phase"], "inertia");
    let last = frames.last().unwrap();
    assert_eq!(last["phase"], "resting");
    assert!(last["position"]["x"].as_f64().unwrap() <= 200.0);
}

#[test]
fn test_clock_prints_time() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["clock", "--format", "12h"]);
    assert_eq!(code, 0);
    let face = stdout.trim();
    assert_eq!(face.len(), 8);
    let hours: u32 = face[..2].parse().unwrap();
    assert!((1..=12).contains(&hours));
}
