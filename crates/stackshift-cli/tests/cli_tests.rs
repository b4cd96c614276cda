use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// Helper function to create a temporary project directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a Command with --no-color running in `dir`
fn stackshift_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("stackshift").expect("Failed to find stackshift binary");
    cmd.current_dir(dir)
        .env_remove("STACKSHIFT_TEST_MODE")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

fn read_state(dir: &Path) -> Value {
    let text = fs::read_to_string(dir.join(".stackshift-state.json")).expect("state file");
    serde_json::from_str(&text).expect("state file parses")
}

#[test]
fn test_cli_without_command_shows_default_state() {
    let temp_dir = create_cli_test_environment();

    stackshift_cmd(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("# Workflow:"))
        .stdout(predicate::str::contains("- Current step: not started"))
        .stdout(predicate::str::contains("- Progress: 0/6 (0%)"));

    assert!(!temp_dir.path().join(".stackshift-state.json").exists());
}

#[test]
fn test_cli_init_and_complete_steps() {
    let temp_dir = create_cli_test_environment();

    stackshift_cmd(temp_dir.path())
        .args(["state", "init", "--route", "brownfield"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized workflow"))
        .stdout(predicate::str::contains("- Route: brownfield"));

    stackshift_cmd(temp_dir.path())
        .args(["state", "complete", "analyze", "--details", r#"{"files": 12}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed Analyze"))
        .stdout(predicate::str::contains("✓ 1. Analyze"));

    stackshift_cmd(temp_dir.path())
        .args(["state", "next"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Next step: 2. Reverse Engineer (reverse-engineer)",
        ));

    let state = read_state(temp_dir.path());
    assert_eq!(state["completedSteps"], serde_json::json!(["analyze"]));
    assert_eq!(state["currentStep"], "reverse-engineer");
    assert_eq!(state["stepDetails"]["analyze"]["details"]["files"], 12);
}

#[test]
fn test_cli_start_completed_step_fails() {
    let temp_dir = create_cli_test_environment();

    stackshift_cmd(temp_dir.path())
        .args(["state", "complete", "analyze"])
        .assert()
        .success();

    stackshift_cmd(temp_dir.path())
        .args(["state", "start", "analyze"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already completed"))
        .stderr(predicate::str::contains(
            "Ensure you are running from your project root.",
        ));
}

#[test]
fn test_cli_rejects_unknown_step() {
    let temp_dir = create_cli_test_environment();

    stackshift_cmd(temp_dir.path())
        .args(["state", "start", "deploy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid workflow step"));
}

#[test]
fn test_cli_invalid_details_json() {
    let temp_dir = create_cli_test_environment();

    stackshift_cmd(temp_dir.path())
        .args(["state", "complete", "analyze", "--details", "{oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--details must be valid JSON"));
}

#[test]
fn test_cli_route_and_config() {
    let temp_dir = create_cli_test_environment();

    stackshift_cmd(temp_dir.path())
        .args(["state", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No workflow options set"));

    stackshift_cmd(temp_dir.path())
        .args(["state", "route", "greenfield"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Route set to greenfield"));

    stackshift_cmd(temp_dir.path())
        .args([
            "state",
            "config",
            "--mode",
            "cruise-control",
            "--scope",
            "p0-p1",
            "--target-stack",
            "Rust",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("- **mode**: cruise-control"))
        .stdout(predicate::str::contains("- **implementationScope**: p0-p1"));

    let state = read_state(temp_dir.path());
    assert_eq!(state["route"], "greenfield");
    assert_eq!(state["config"]["route"], "greenfield");
    assert_eq!(state["config"]["targetStack"], "Rust");
}

#[test]
fn test_cli_reset() {
    let temp_dir = create_cli_test_environment();

    stackshift_cmd(temp_dir.path())
        .args(["state", "reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No workflow state to delete"));

    stackshift_cmd(temp_dir.path())
        .args(["state", "init"])
        .assert()
        .success();

    stackshift_cmd(temp_dir.path())
        .args(["state", "reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted workflow state"));
}

#[test]
fn test_cli_directory_flag_targets_subdirectory() {
    let temp_dir = create_cli_test_environment();
    fs::create_dir(temp_dir.path().join("service")).unwrap();

    stackshift_cmd(temp_dir.path())
        .args(["--directory", "service", "state", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Workflow: service"));

    assert!(temp_dir
        .path()
        .join("service")
        .join(".stackshift-state.json")
        .is_file());
    assert!(!temp_dir.path().join(".stackshift-state.json").exists());
}

#[test]
fn test_cli_directory_traversal_is_rejected_without_leaking_paths() {
    let temp_dir = create_cli_test_environment();
    let project = temp_dir.path().join("project");
    fs::create_dir(&project).unwrap();

    stackshift_cmd(&project)
        .args(["--directory", "../../etc", "state", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Access denied"))
        .stderr(predicate::str::contains("/etc").not());

    stackshift_cmd(&project)
        .args(["validate", "../"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Access denied"));

    stackshift_cmd(&project)
        .args(["validate", "src/../docs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is inside the workspace"));
}

#[test]
fn test_cli_metacharacters_are_rejected() {
    let temp_dir = create_cli_test_environment();

    stackshift_cmd(temp_dir.path())
        .args(["validate", "docs; rm -rf ~"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid characters"));
}

#[test]
fn test_cli_malformed_state_file_is_reported() {
    let temp_dir = create_cli_test_environment();
    fs::write(temp_dir.path().join(".stackshift-state.json"), "{ nope").unwrap();

    stackshift_cmd(temp_dir.path())
        .args(["state", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid document"));
}

#[test]
fn test_cli_batch_session_workflow() {
    let temp_dir = create_cli_test_environment();
    fs::create_dir_all(temp_dir.path().join("repo-a").join("sub")).unwrap();
    fs::create_dir_all(temp_dir.path().join("repo-b")).unwrap();

    stackshift_cmd(temp_dir.path())
        .args([
            "batch",
            "create",
            "--total",
            "2",
            "--batch-size",
            "1",
            "--answers",
            r#"{"route": "brownfield", "mode": "cruise-control"}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Started batch session"))
        .stdout(predicate::str::contains("- Processed: 0/2 (batches of 1)"));

    stackshift_cmd(temp_dir.path())
        .args(["--directory", "repo-a/sub", "batch", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- **route**: \"brownfield\""));

    // A new workflow below the batch root picks up the shared answers.
    stackshift_cmd(temp_dir.path())
        .args(["--directory", "repo-a", "state", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Route: brownfield"))
        .stdout(predicate::str::contains("- **mode**: cruise-control"));

    stackshift_cmd(temp_dir.path())
        .args(["--directory", "repo-a", "batch", "mark", "repo-a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed repo-a"));

    stackshift_cmd(temp_dir.path())
        .args(["--directory", "repo-b", "batch", "mark", "repo-b"])
        .assert()
        .success()
        .stdout(predicate::str::contains("batch complete"));

    stackshift_cmd(temp_dir.path())
        .args(["batch", "mark", "repo-c"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already processed all 2"));

    stackshift_cmd(temp_dir.path())
        .args(["batch", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted batch session"));
}

#[test]
fn test_cli_batch_create_rejects_zero_total() {
    let temp_dir = create_cli_test_environment();

    stackshift_cmd(temp_dir.path())
        .args(["batch", "create", "--total", "0", "--batch-size", "1"])
        .assert()
        .failure();

    assert!(!temp_dir
        .path()
        .join(".stackshift-batch-session.json")
        .exists());
}

#[test]
fn test_cli_batch_answers_are_write_once() {
    let temp_dir = create_cli_test_environment();
    // Stop the upward search at the temp dir.
    fs::create_dir(temp_dir.path().join(".git")).unwrap();

    stackshift_cmd(temp_dir.path())
        .args(["batch", "answer", "--answers", r#"{"mode": "manual"}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No batch session found"));

    stackshift_cmd(temp_dir.path())
        .args([
            "batch",
            "create",
            "--total",
            "3",
            "--batch-size",
            "1",
            "--answers",
            r#"{"mode": "manual"}"#,
        ])
        .assert()
        .success();

    stackshift_cmd(temp_dir.path())
        .args([
            "batch",
            "answer",
            "--answers",
            r#"{"mode": "cruise-control", "targetStack": "Rust"}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("- **mode**: \"manual\""))
        .stdout(predicate::str::contains("- **targetStack**: \"Rust\""));
}
