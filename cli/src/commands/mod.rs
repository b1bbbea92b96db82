//! # archquery Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the top-level commands of the archquery CLI. Each
//! command defines its own `clap` arguments struct and an async handler that
//! receives the parsed arguments and the resolved configuration.
//!
//! ## Commands
//!
//! - `run`: the full pipeline (fetch, modify, build), each phase skippable
//! - `fetch`: sync pacman databases, pick packages, and check out their recipes
//! - `modify`: rewrite recipes so their build runs under `codeql database create`
//! - `build`: build each package, producing one CodeQL database per package
//! - `check`: verify required executables and passwordless sudo
//!
use crate::common::packages;
use crate::core::{config::Config, error::Result};

/// Full pipeline: fetch, modify, build.
pub mod run;
/// Package selection and recipe checkout.
pub mod fetch;
/// Recipe rewriting phase.
pub mod modify;
/// Package build / database generation phase.
pub mod build;
/// Host prerequisite checks.
pub mod check;

/// Uses the packages named on the command line, or every package directory in
/// the working directory when none were named.
pub(crate) fn packages_or_working_directory(
    config: &Config,
    packages: Vec<String>,
) -> Result<Vec<String>> {
    if packages.is_empty() {
        packages::packages_from_working_directory(config)
    } else {
        Ok(packages)
    }
}
