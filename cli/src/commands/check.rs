//! # archquery Check Command
//!
//! File: cli/src/commands/check.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `archquery check`, which reports whether the host is ready for a
//! run: every required executable must be on PATH, and sudo should not prompt
//! for a password (builds install dependencies through it). A missing
//! executable fails the command; a sudo prompt is only a warning.
//!
use crate::common::system::{sudo, tools};
use crate::core::{
    config::Config,
    error::{ArchqueryError, Result},
};
use clap::Parser;

/// Arguments for `archquery check`.
#[derive(Parser, Debug)]
#[command(about = "Check required executables and sudo privileges")]
pub struct CheckArgs {}

/// Handler for `archquery check`.
pub async fn handle_check(_args: CheckArgs, config: &Config) -> Result<()> {
    tracing::info!("Handling check command...");

    let required = &config.selection.required_executables;
    let missing = tools::find_missing_executables(required);

    println!("Checking required executables...");
    for exe in required {
        let state = if missing.contains(exe) { "Missing." } else { "Found." };
        println!("  - {}: {}", exe, state);
    }

    match sudo::passwordless_sudo().await {
        Ok(true) => println!("Passwordless sudo: yes"),
        Ok(false) => println!(
            "Passwordless sudo: no (builds will prompt for a password when installing dependencies)"
        ),
        Err(e) => println!("Passwordless sudo: unknown ({:#})", e),
    }

    if !missing.is_empty() {
        anyhow::bail!(ArchqueryError::MissingExecutables(missing));
    }
    println!("All required executables found.");
    Ok(())
}
