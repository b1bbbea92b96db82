//! # archquery CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Every test gets
//! an isolated temporary directory that doubles as the working directory, the
//! current directory (so no stray `.archquery.toml` is picked up), and the XDG
//! config home (so no user config is picked up).
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Returns a command for the compiled `archquery` binary.
pub fn archquery_cmd() -> Command {
    Command::cargo_bin("archquery").expect("Failed to find archquery binary for testing")
}

/// A temporary working directory with helpers to lay out package recipes.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp workspace"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of `package`'s recipe using the default `trunk/PKGBUILD` layout.
    pub fn recipe_path(&self, package: &str) -> PathBuf {
        self.path().join(package).join("trunk").join("PKGBUILD")
    }

    pub fn write_recipe(&self, package: &str, content: &str) {
        let path = self.recipe_path(package);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn read_recipe(&self, package: &str) -> String {
        fs::read_to_string(self.recipe_path(package)).unwrap()
    }

    /// An `archquery` command isolated to this workspace.
    pub fn cmd(&self) -> Command {
        let mut cmd = archquery_cmd();
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"))
            .env_remove("ARCHQUERY_WORKDIR")
            .env_remove("ARCHQUERY_CODEQL_DIR")
            .env_remove("RUST_LOG")
            .arg("--workdir")
            .arg(self.path())
            .arg("--codeql-dir")
            .arg("/opt/ql");
        cmd
    }
}
