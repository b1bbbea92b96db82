//! # archquery Package Selection and Fetching (`common::packages`)
//!
//! File: cli/src/common/packages.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Decides *which* packages a run works on and gets their recipes onto disk.
//!
//! ## Architecture
//!
//! - **`synchronize_package_databases`**: `sudo pacman -Sy`, so dependency installs during builds see current repos.
//! - **`filter_candidates`**: pure filter over an `asp list-all` listing using the configured exclusion substrings and bad-package list.
//! - **`choose_packages`**: shuffles candidates and keeps the first `count`.
//! - **`select_packages`**: the above three wired to the real `asp` listing.
//! - **`fetch_packages`**: runs `asp checkout <pkg>` for every package at once in the working directory and waits for all of them.
//! - **`packages_from_working_directory`**: when nothing was selected, every package directory already present.
//!
//! Fetches are independent of each other, so they are the one place archquery
//! runs external processes concurrently. Building stays sequential.
//!
use crate::common::fs::io;
use crate::common::process::{self, ExternalCommand};
use crate::core::config::{Config, SelectionConfig};
use crate::core::error::{ArchqueryError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{error, info, warn};

/// Refreshes pacman's sync databases with `sudo pacman -Sy`.
pub async fn synchronize_package_databases() -> Result<()> {
    info!("Updating package databases with 'pacman -Sy'");
    process::run_checked(&ExternalCommand::new("sudo", ["pacman", "-Sy"])).await
}

/// Keeps the package names from `listing` (one per line) that pass the selection filters.
pub fn filter_candidates(listing: &str, selection: &SelectionConfig) -> Vec<String> {
    listing
        .lines()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter(|name| {
            !selection
                .excluded_substrings
                .iter()
                .any(|pattern| name.contains(pattern.as_str()))
        })
        .filter(|name| !selection.bad_packages.iter().any(|bad| bad == name))
        .map(str::to_string)
        .collect()
}

/// Shuffles `candidates` with `rng` and returns at most `count` of them.
pub fn choose_packages<R: Rng + ?Sized>(
    mut candidates: Vec<String>,
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    candidates.shuffle(rng);
    candidates.truncate(count);
    candidates
}

/// Lists every package known to `asp`, filters, and picks `count` at random.
pub async fn select_packages(config: &Config, count: usize) -> Result<Vec<String>> {
    let cmd = ExternalCommand::new("asp", ["list-all"]);
    let output = process::capture(&cmd).await?;
    if !output.status.success() {
        anyhow::bail!(ArchqueryError::ExternalCommand {
            cmd: cmd.to_string(),
            status: output.status.to_string(),
            output: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    let candidates = filter_candidates(&String::from_utf8_lossy(&output.stdout), &config.selection);
    info!("{} candidate packages after filtering", candidates.len());
    let chosen = choose_packages(candidates, count, &mut rand::thread_rng());
    if chosen.len() < count {
        warn!(
            "Only {} packages available, fewer than the {} requested",
            chosen.len(),
            count
        );
    }
    Ok(chosen)
}

/// Checks out every package's recipe concurrently into the working directory.
///
/// Returns the packages whose checkout failed. Those failures are logged but
/// do not stop the other fetches.
pub async fn fetch_packages(config: &Config, packages: &[String]) -> Result<Vec<String>> {
    let workdir = config.working_dir();
    io::ensure_dir_exists(&workdir)?;
    info!("Fetching {} recipes into {}", packages.len(), workdir.display());

    let cmds: Vec<ExternalCommand> = packages
        .iter()
        .map(|pkg| ExternalCommand::new("asp", ["checkout", pkg.as_str()]).current_dir(&workdir))
        .collect();
    let results = process::run_all(&cmds).await;

    let mut failed = Vec::new();
    for (pkg, result) in packages.iter().zip(results) {
        match result {
            Ok(status) if status.success() => {}
            Ok(status) => {
                error!("Fetching {} failed: {}", pkg, status);
                failed.push(pkg.clone());
            }
            Err(e) => {
                error!("Fetching {} failed: {:#}", pkg, e);
                failed.push(pkg.clone());
            }
        }
    }
    Ok(failed)
}

/// Every package directory in the working directory, minus the database directory.
pub fn packages_from_working_directory(config: &Config) -> Result<Vec<String>> {
    info!(
        "No packages specified or selected. Packages to process are determined by the contents of {}",
        config.working_directory
    );
    io::list_subdirectories(
        &config.working_dir(),
        &[config.analysis.database_subdir.as_str()],
    )
}
