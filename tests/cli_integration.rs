//! CLI integration tests.

use assert_cmd::Command;
use predicates::prelude::*;

fn switchyard() -> Command {
    Command::cargo_bin("switchyard").unwrap()
}

#[test]
fn config_init_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("switchyard.toml");

    switchyard()
        .args(["config", "init", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file created"));

    assert!(output.exists());
}

#[test]
fn config_init_refuses_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("switchyard.toml");
    std::fs::write(&output, "existing").unwrap();

    switchyard()
        .args(["config", "init", "--output"])
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn route_explains_the_decision() {
    let dir = tempfile::tempdir().unwrap();

    switchyard()
        .current_dir(dir.path())
        .env("SWITCHYARD_DATA_DIR", dir.path().join("data"))
        .args(["route", "generate a React dashboard component"])
        .assert()
        .success()
        .stdout(predicate::str::contains("agent-cli"));
}

#[test]
fn route_json_reports_forced_backend() {
    let dir = tempfile::tempdir().unwrap();

    switchyard()
        .current_dir(dir.path())
        .env("SWITCHYARD_DATA_DIR", dir.path().join("data"))
        .args([
            "route",
            "anything",
            "--backend",
            "fast-inference",
            "--json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"backend\": \"fast-inference\""))
        .stdout(predicate::str::contains("\"confidence\": 1.0"));
}

#[test]
fn status_starts_in_normal_mode() {
    let dir = tempfile::tempdir().unwrap();

    switchyard()
        .current_dir(dir.path())
        .env("SWITCHYARD_DATA_DIR", dir.path().join("data"))
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"fallback_enabled\": false"));
}

#[test]
fn fallback_enter_then_status_then_clear() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");

    switchyard()
        .current_dir(dir.path())
        .env("SWITCHYARD_DATA_DIR", &data_dir)
        .args(["fallback", "enter", "--reason", "rate-limit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fallback mode active"));

    switchyard()
        .current_dir(dir.path())
        .env("SWITCHYARD_DATA_DIR", &data_dir)
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"fallback_enabled\": true"))
        .stdout(predicate::str::contains("\"fallback_reason\": \"rate-limit\""));

    switchyard()
        .current_dir(dir.path())
        .env("SWITCHYARD_DATA_DIR", &data_dir)
        .args(["fallback", "clear"])
        .assert()
        .success();

    switchyard()
        .current_dir(dir.path())
        .env("SWITCHYARD_DATA_DIR", &data_dir)
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"fallback_enabled\": false"));
}

#[test]
fn outcomes_list_is_empty_initially() {
    let dir = tempfile::tempdir().unwrap();

    switchyard()
        .current_dir(dir.path())
        .env("SWITCHYARD_DATA_DIR", dir.path().join("data"))
        .args(["outcomes", "list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"outcomes\": []"));
}

#[test]
fn outcomes_mark_reported_unknown_id_fails() {
    let dir = tempfile::tempdir().unwrap();

    switchyard()
        .current_dir(dir.path())
        .env("SWITCHYARD_DATA_DIR", dir.path().join("data"))
        .args(["outcomes", "mark-reported", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No outcome recorded"));
}

#[test]
fn completions_generate_for_bash() {
    switchyard()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("switchyard"));
}
