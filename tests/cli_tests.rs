//! Integration tests for the Runboard CLI
//!
//! These tests run the actual binary against run files in a temp dir.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const RUNS_JSON: &str = r#"[
  {
    "runId": "8c5e2a1f-3b7d-4e0a-9f21-6d4c8b0a1e37",
    "status": "SUCCESS",
    "canTerminate": false,
    "mode": "default",
    "pipelineSnapshotId": "snap-1",
    "pipelineName": "etl_nightly",
    "tags": [{ "key": "owner", "value": "data-platform" }]
  },
  {
    "runId": "1f9d7c30-aa42-4f6b-8e55-0b3c2d9e7f10",
    "status": "FAILURE",
    "canTerminate": false,
    "mode": "gpu",
    "pipelineSnapshotId": "snap-2",
    "pipelineName": "model_training",
    "tags": [{ "key": "owner", "value": "ml" }]
  }
]"#;

/// Get the binary to test, isolated from user config and env
fn runboard_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("runboard").unwrap();
    cmd.arg("--config")
        .arg(dir.path().join("missing-config.toml"))
        .env_remove("RUNBOARD_RUNS_FILE")
        .env_remove("RUNBOARD_PAGE_SIZE")
        .env("RUST_LOG", "off");
    cmd
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_help_flag() {
    let dir = TempDir::new().unwrap();
    runboard_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("terminal run table"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_validate_valid_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "runs.json", RUNS_JSON);

    runboard_cmd(&dir)
        .arg("validate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"))
        .stdout(predicate::str::contains("Runs: 2"))
        .stdout(predicate::str::contains("Pipelines: 2"))
        .stdout(predicate::str::contains("FAILURE: 1"));
}

#[test]
fn test_validate_duplicate_ids() {
    let dir = TempDir::new().unwrap();
    let yaml = r#"
- runId: same
  status: SUCCESS
  mode: default
  pipelineSnapshotId: s1
  pipelineName: p
- runId: same
  status: FAILURE
  mode: default
  pipelineSnapshotId: s1
  pipelineName: p
"#;
    let path = write_file(&dir, "runs.yaml", yaml);

    runboard_cmd(&dir)
        .arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("RB-011"))
        .stderr(predicate::str::contains("Fix:"));
}

#[test]
fn test_validate_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "runs.txt", RUNS_JSON);

    runboard_cmd(&dir)
        .arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("RB-010"));
}

#[test]
fn test_list_renders_rows_in_order() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "runs.json", RUNS_JSON);

    let output = runboard_cmd(&dir)
        .arg("list")
        .arg(&path)
        .args(["--width", "110", "--utc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Execution Params"))
        .stdout(predicate::str::contains("[owner: data-platform]"))
        .stdout(predicate::str::contains("Mode: gpu"))
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(output).unwrap();
    let first = text.find("8c5e2a1f").unwrap();
    let second = text.find("1f9d7c30").unwrap();
    assert!(first < second);
}

#[test]
fn test_list_with_tag_filter() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "runs.json", RUNS_JSON);

    runboard_cmd(&dir)
        .arg("list")
        .arg(&path)
        .args(["--filter", "tag:owner=ml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("model_training"))
        .stdout(predicate::str::contains("etl_nightly").not());
}

#[test]
fn test_list_empty_shows_placeholder() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "runs.json", "[]");

    runboard_cmd(&dir)
        .arg("list")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Pipeline Runs"))
        .stdout(predicate::str::contains("No runs to display."))
        .stdout(predicate::str::contains("Execution Params").not());
}

#[test]
fn test_list_rejects_bad_filter_token() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "runs.json", RUNS_JSON);

    runboard_cmd(&dir)
        .arg("list")
        .arg(&path)
        .args(["--filter", "nonsense"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("RB-020"));
}

#[test]
fn test_list_rejects_unknown_status_filter() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "runs.json", RUNS_JSON);

    runboard_cmd(&dir)
        .arg("list")
        .arg(&path)
        .args(["--filter", "status:DONE"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("8c5e2a1f").not())
        .stderr(predicate::str::contains("RB-021"))
        .stderr(predicate::str::contains("Fix:"));
}

#[test]
fn test_list_rejects_tag_filter_without_separator() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "runs.json", RUNS_JSON);

    runboard_cmd(&dir)
        .arg("list")
        .arg(&path)
        .args(["--filter", "tag:owner"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("RB-020"));
}

#[test]
fn test_malformed_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "runs.json", RUNS_JSON);
    let config = write_file(&dir, "config.toml", "[display\npage_size = ");

    Command::cargo_bin("runboard")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("RB-030"))
        .stderr(predicate::str::contains("config.toml"));
}

#[test]
fn test_zero_page_size_lists_every_run() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "runs.json", RUNS_JSON);

    runboard_cmd(&dir)
        .env("RUNBOARD_PAGE_SIZE", "0")
        .arg("list")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("8c5e2a1f"))
        .stdout(predicate::str::contains("1f9d7c30"));
}
