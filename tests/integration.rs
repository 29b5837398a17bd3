//! Integration tests for meeting-probe
//!
//! Note: Probe runs require Chrome and a live target app.
//! These tests focus on the CLI surface.

use std::process::Command;

/// Test that the binary can show help
#[test]
fn test_help_command() {
    let output = Command::new("cargo")
        .args(["run", "--", "--help"])
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("meeting-probe") || stdout.contains("probe"),
        "Help should mention meeting-probe"
    );
}

/// Test that every probe subcommand is listed in help
#[test]
fn test_help_lists_probes() {
    let output = Command::new("cargo")
        .args(["run", "--", "--help"])
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    for subcommand in ["app", "landing", "room", "all"] {
        assert!(
            stdout.contains(subcommand),
            "Help should list the {} subcommand",
            subcommand
        );
    }
}

/// Test that version command works
#[test]
fn test_version_command() {
    let output = Command::new("cargo")
        .args(["run", "--", "--version"])
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("0.") || stdout.contains("meeting-probe"),
        "Version should be shown"
    );
}

/// Test that a missing subcommand is rejected
#[test]
fn test_requires_subcommand() {
    let output = Command::new("cargo")
        .args(["run", "--"])
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("Failed to execute command");

    assert!(
        !output.status.success(),
        "Running without a subcommand should fail"
    );
}
