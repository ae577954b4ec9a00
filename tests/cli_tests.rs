#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::TempDir;

#[allow(deprecated)]
fn run_cli(store: &std::path::Path, script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.arg(store).write_stdin(script.to_string()).assert()
}

#[test]
fn cli_starts_wizard_without_saved_setup() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir.path().join("store.json"), "quit\n")
        .success()
        .stdout(str_contains("No saved setup found."))
        .stdout(str_contains("Setup step 1 of 2 (50%)"));
}

#[test]
fn cli_wizard_saves_and_splits() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("store.json");
    run_cli(
        &store,
        "floors 2\npeople 5\nnext\nassign 1 3\nassign 2 2\nnext\namount 100\nquit\n",
    )
    .success()
    .stdout(str_contains("Setup saved."))
    .stdout(str_contains("S/ 60.00"))
    .stdout(str_contains("S/ 40.00"));

    run_cli(&store, "amount 15.21\nmethod equal\nquit\n")
        .success()
        .stdout(str_contains("Loaded setup with 2 floors and 5 people."))
        .stdout(str_contains("S/ 7.70"));
}

#[test]
fn cli_refuses_unbalanced_finish() {
    let dir = TempDir::new().unwrap();
    run_cli(
        &dir.path().join("store.json"),
        "floors 2\npeople 5\nnext\nassign 1 1\nnext\nquit\n",
    )
    .success()
    .stdout(str_contains(
        "Invalid floorPeople: distribution is unbalanced: 4 people left to assign",
    ));
}

#[test]
fn cli_reports_field_errors() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir.path().join("store.json"), "floors 11\npeople 0\nquit\n")
        .success()
        .stdout(str_contains(
            "Invalid floors: group count must be between 1 and 10 (got 11)",
        ))
        .stdout(str_contains("Invalid totalPeople"));
}

#[test]
fn cli_treats_corrupt_store_as_missing() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("store.json");
    std::fs::write(&store, r#"{"splitBillData": "{broken"}"#).unwrap();
    run_cli(&store, "quit\n")
        .success()
        .stdout(str_contains("No saved setup found."));
}

#[test]
fn cli_auto_distribute_and_summary() {
    let dir = TempDir::new().unwrap();
    run_cli(
        &dir.path().join("store.json"),
        "floors 5\npeople 11\nnext\nauto\nnext\namount 110\nsummary\nquit\n",
    )
    .success()
    .stdout(str_contains("all assigned"))
    .stdout(str_contains("Floor 1: S/ 30.00 (3 people)"))
    .stdout(str_contains("Rounded total: S/ 110.00"));
}
