//! # archquery Fetch Command
//!
//! File: cli/src/commands/fetch.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `archquery fetch`: refresh pacman's sync databases, pick a random
//! sample of packages (or take the ones named), and check out their recipes
//! with `asp` into the working directory. All checkouts run concurrently.
//!
//! ```bash
//! # Fetch the configured default number of random packages
//! archquery fetch
//!
//! # Fetch 20 random packages
//! archquery fetch --package-count 20
//!
//! # Fetch specific packages
//! archquery fetch zlib nano
//! ```
//!
use crate::common::packages;
use crate::common::system::tools;
use crate::core::{config::Config, error::Result};
use clap::Parser;
use tracing::{debug, info, warn};

/// Arguments for `archquery fetch`.
#[derive(Parser, Debug)]
#[command(about = "Select packages and check out their recipes")]
pub struct FetchArgs {
    /// How many random packages to fetch (default: `selection.default_count`).
    #[arg(long, conflicts_with = "packages")]
    package_count: Option<usize>,

    /// Specific packages to fetch instead of a random selection.
    packages: Vec<String>,
}

/// Handler for `archquery fetch`.
pub async fn handle_fetch(args: FetchArgs, config: &Config) -> Result<()> {
    debug!("Fetch args: {:?}", args);
    tools::ensure_executables(&config.selection.required_executables)?;
    let fetched = download(config, args.packages, args.package_count).await?;
    println!("Fetched {} packages into {}", fetched.len(), config.working_directory);
    for (i, pkg) in fetched.iter().enumerate() {
        println!("  {}. {}", i + 1, pkg);
    }
    Ok(())
}

/// Syncs pacman, selects packages unless some were named, and fetches them.
///
/// Returns the packages whose recipes were fetched successfully.
pub(crate) async fn download(
    config: &Config,
    named: Vec<String>,
    package_count: Option<usize>,
) -> Result<Vec<String>> {
    info!("Downloading recipes");
    packages::synchronize_package_databases().await?;

    let selected = if named.is_empty() {
        let count = match package_count {
            Some(count) => count,
            None => {
                warn!(
                    "No --package-count specified. Defaulting to {}",
                    config.selection.default_count
                );
                config.selection.default_count
            }
        };
        packages::select_packages(config, count).await?
    } else {
        named
    };

    let failed = packages::fetch_packages(config, &selected).await?;
    if !failed.is_empty() {
        warn!("Could not fetch: {}", failed.join(", "));
    }
    Ok(selected
        .into_iter()
        .filter(|pkg| !failed.contains(pkg))
        .collect())
}
