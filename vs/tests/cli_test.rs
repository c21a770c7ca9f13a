//! CLI smoke tests for the vs binary

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_runs() {
    Command::cargo_bin("vs")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan version history store"));
}

#[test]
fn test_list_empty_workspace() {
    let temp = tempfile::TempDir::new().unwrap();
    Command::cargo_bin("vs")
        .unwrap()
        .current_dir(temp.path())
        .args(["--workspace", "."])
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No versions found"));
}

#[test]
fn test_show_missing_version_fails() {
    let temp = tempfile::TempDir::new().unwrap();
    Command::cargo_bin("vs")
        .unwrap()
        .current_dir(temp.path())
        .args(["--workspace", ".", "show", "0198aaaa-0000-7000-8000-000000000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Version not found"));
}
