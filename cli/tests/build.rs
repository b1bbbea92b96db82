//! # archquery CLI Build Integration Tests
//!
//! File: cli/tests/build.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Runs `archquery build` with the build command replaced (through a project
//! `.archquery.toml`) by a small shell script, so the batch behavior can be
//! checked without `makepkg`.
//!

mod common;
use common::*;
use predicates::prelude::*;
use std::fs;

fn configure_build_command(ws: &Workspace, script: &str) {
    let config = format!(
        "[build]\ncommand = [\"sh\", \"-c\", \"{}\"]\n",
        script.replace('\\', "\\\\").replace('"', "\\\"")
    );
    fs::write(ws.path().join(".archquery.toml"), config).unwrap();
}

#[test]
fn test_build_reports_failed_packages() {
    let ws = Workspace::new();
    ws.write_recipe("good", "build() {\n  make\n}\n");
    ws.write_recipe("bad", "build() {\n  false\n}\n");
    configure_build_command(&ws, "echo building; grep -q make PKGBUILD");

    ws.cmd()
        .args(["build"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("=== Build process completed ===")
                .and(predicate::str::contains("The following packages failed to build:\n  1. bad (exit status: 1)\n")),
        );

    assert!(ws.path().join("codeql_databases").is_dir());
    let log = fs::read_to_string(ws.path().join("build.log")).unwrap();
    assert_eq!(log.matches("building").count(), 2);
}

#[test]
fn test_build_all_succeed() {
    let ws = Workspace::new();
    ws.write_recipe("one", "build() {\n  make\n}\n");
    configure_build_command(&ws, "exit 0");

    ws.cmd()
        .args(["build", "one"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("=== Build process completed ===")
                .and(predicate::str::contains("failed to build").not()),
        );
}
