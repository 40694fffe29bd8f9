use assert_fs::TempDir;

mod common;
use common::starsync;

/// Integration tests for the starsync CLI
/// These tests run the actual binary and verify its behavior

#[test]
fn test_cli_help() {
    let output = starsync(&["--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    // Verify help contains the subcommands and flags
    assert!(stdout.contains("run"));
    assert!(stdout.contains("once"));
    assert!(stdout.contains("list"));
    assert!(stdout.contains("--target-dir"));
    assert!(stdout.contains("--interval"));
}

#[test]
fn test_cli_version() {
    let output = starsync(&["--version"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("starsync"));
}

#[test]
fn test_invalid_command() {
    let output = starsync(&["nonexistent-command"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("unrecognized") || stderr.contains("invalid")
    );
}

#[test]
fn test_missing_token_exits_before_any_work() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("starred");

    let output = starsync(&["once", "--target-dir", target.to_str().unwrap()])
        .env_remove("GITHUB_TOKEN")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("GITHUB_TOKEN"));

    // Startup failed before any filesystem writes.
    assert!(!target.exists());
}

#[test]
fn test_invalid_interval_is_rejected() {
    let output = starsync(&["--interval", "soon", "once"])
        .env("GITHUB_TOKEN", "dummy-token")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid interval") || stderr.contains("interval"));
}
