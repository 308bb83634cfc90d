//! Shared test helpers for integration tests
//!
//! This module provides common utilities used across all test files.

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

/// Helper to get an hrsd command
pub fn hrsd() -> Command {
    Command::new(cargo::cargo_bin!("hrsd"))
}

/// Helper to create a test portal in a temp directory
pub fn setup_portal() -> TempDir {
    let tmp = TempDir::new().unwrap();
    hrsd()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success();
    tmp
}

/// Helper to submit a request, returning its full id
pub fn create_test_request(tmp: &TempDir, summary: &str, category: &str) -> String {
    let output = hrsd()
        .current_dir(tmp.path())
        .args([
            "new",
            summary,
            "--category",
            category,
            "--employee-name",
            "Test Employee",
        ])
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .find(|l| l.contains("REQ-"))
        .and_then(|l| l.split_whitespace().find(|w| w.starts_with("REQ-")))
        .map(|s| s.to_string())
        .unwrap_or_default()
}
