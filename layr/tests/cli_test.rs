//! CLI smoke tests for the layr binary

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_runs() {
    Command::cargo_bin("layr")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("AI project planner"));
}

#[test]
fn test_providers_lists_registry() {
    let temp = tempfile::TempDir::new().unwrap();
    Command::cargo_bin("layr")
        .unwrap()
        .current_dir(temp.path())
        .arg("providers")
        .assert()
        .success()
        .stdout(predicate::str::contains("groq"))
        .stdout(predicate::str::contains("ollama"));
}

#[test]
fn test_models_uses_configured_provider() {
    let temp = tempfile::TempDir::new().unwrap();
    std::fs::write(temp.path().join(".layr.yml"), "provider:\n  provider: kimi\n").unwrap();

    Command::cargo_bin("layr")
        .unwrap()
        .current_dir(temp.path())
        .arg("models")
        .assert()
        .success()
        .stdout(predicate::str::contains("Kimi"))
        .stdout(predicate::str::contains("kimi-k2-0905"));
}

#[test]
fn test_unknown_subcommand_fails() {
    Command::cargo_bin("layr")
        .unwrap()
        .arg("frobnicate")
        .assert()
        .failure();
}
