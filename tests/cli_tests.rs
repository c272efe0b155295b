//! CLI integration tests
//!
//! Runs the built `notes-server` binary for the commands that exit on their
//! own: help, init and config.

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_notes(args: &[&str], working_dir: &std::path::Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_notes-server"))
        .args(args)
        .arg("--no-color")
        .current_dir(working_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute notes-server")
}

#[test]
fn test_help_command() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_notes(&["--help"], temp_dir.path());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("init"));
    assert!(stdout.contains("--config"));
}

#[test]
fn test_init_then_validate() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let init = run_notes(&["init", "--port", "6000"], temp_dir.path());
    assert!(init.status.success());

    let toml = fs::read_to_string(temp_dir.path().join("notes.toml")).expect("notes.toml");
    assert!(toml.contains("port = 6000"));

    let validate = Command::new(env!("CARGO_BIN_EXE_notes-server"))
        .args(["config", "--validate", "--no-color"])
        .current_dir(temp_dir.path())
        .env("JWT_SECRET", "cli-test-secret")
        .output()
        .expect("Failed to execute notes-server");

    assert!(validate.status.success());
    let stdout = String::from_utf8_lossy(&validate.stdout);
    assert!(stdout.contains("127.0.0.1:6000"));
    assert!(stdout.contains("Configuration is valid"));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("notes.toml"), "# mine").expect("write");

    let output = run_notes(&["init"], temp_dir.path());

    assert!(!output.status.success());
    let content = fs::read_to_string(temp_dir.path().join("notes.toml")).expect("read");
    assert_eq!(content, "# mine");
}

#[test]
fn test_validate_fails_without_signing_key() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(
        temp_dir.path().join("notes.toml"),
        "[auth]\njwt_secret_env = \"NOTES_CLI_TEST_UNSET_SECRET\"\n",
    )
    .expect("write");

    let output = run_notes(&["config", "--validate"], temp_dir.path());

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("NOTES_CLI_TEST_UNSET_SECRET"));
}

#[test]
fn test_server_exits_when_config_missing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let output = run_notes(&["--config", "missing.toml"], temp_dir.path());

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing.toml"));
}
