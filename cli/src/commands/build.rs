//! # archquery Build Command
//!
//! File: cli/src/commands/build.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `archquery build`. Each package is built with the configured
//! build command (by default `makepkg --noconfirm --syncdeps ...`) from its
//! recipe directory. Because the rewritten recipes wrap their build step in
//! `codeql database create`, building a package is what produces its database
//! under `<working directory>/codeql_databases/<package>`.
//!
//! ## Workflow
//!
//! 1. Resolve the package list (named packages, or every package directory).
//! 2. Warn if sudo will ask for a password, since dependency installs use it.
//! 3. Remove the previous build log and make sure the database directory exists.
//! 4. Build packages strictly one after another, appending output to the build log.
//! 5. Print `=== Build process completed ===` and the packages that failed.
//!
//! ```bash
//! archquery build
//! archquery build zlib nano
//! ```
//!
use crate::commands::packages_or_working_directory;
use crate::common::batch::{self, BatchReport, CommandBuilder};
use crate::common::system::sudo;
use crate::core::{config::Config, error::Result};
use clap::Parser;
use tracing::{debug, info, warn};

/// Arguments for `archquery build`.
#[derive(Parser, Debug)]
#[command(about = "Build packages and generate their CodeQL databases")]
pub struct BuildArgs {
    /// Packages to build (default: every package directory in the working directory).
    packages: Vec<String>,
}

/// Handler for `archquery build`.
pub async fn handle_build(args: BuildArgs, config: &Config) -> Result<()> {
    debug!("Build args: {:?}", args);
    let packages = packages_or_working_directory(config, args.packages)?;
    warn_if_sudo_prompts().await;
    let report = build_packages(config, &packages).await?;
    print!("{}", report.render());
    Ok(())
}

/// Runs the build phase over `packages` with the configured build command.
pub(crate) async fn build_packages(config: &Config, packages: &[String]) -> Result<BatchReport> {
    info!("Building {} packages and databases", packages.len());
    let builder = CommandBuilder::from_config(config);
    batch::run_build_phase(config, &builder, &batch::batch_items(config, packages)).await
}

/// Builds install dependencies through sudo; a password prompt would stall the batch.
pub(crate) async fn warn_if_sudo_prompts() {
    match sudo::passwordless_sudo().await {
        Ok(true) => debug!("Passwordless sudo available."),
        Ok(false) => warn!(
            "The current user cannot use sudo without a password. \
             Installing build dependencies will prompt for it, so the batch must be monitored."
        ),
        Err(e) => warn!("Could not check sudo privileges: {:#}", e),
    }
}
