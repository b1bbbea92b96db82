//! # archquery CLI Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Verifies top-level behavior of the `archquery` binary: standard flags,
//! subcommand help, and argument conflicts.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    archquery_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("run")
                .and(predicate::str::contains("modify"))
                .and(predicate::str::contains("build"))
                .and(predicate::str::contains("fetch"))
                .and(predicate::str::contains("check")),
        );
}

#[test]
fn test_version_flag() {
    archquery_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_package_count_with_no_download_is_rejected() {
    archquery_cmd()
        .args(["run", "--no-download", "--package-count", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_invalid_project_config_fails() {
    let ws = Workspace::new();
    std::fs::write(ws.path().join(".archquery.toml"), "[recipe]\nfunction = \"not valid\"\n").unwrap();
    ws.cmd()
        .args(["modify"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid shell function name"));
}
