//! # archquery Run Command
//!
//! File: cli/src/commands/run.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `archquery run`, the whole experiment in one command:
//!
//! 1. **Download** (skip with `--no-download`): sync pacman, select packages
//!    (random sample of `--package-count`, or the ones named), and check out
//!    their recipes concurrently.
//! 2. **Modify** (skip with `--no-modify`): rewrite each recipe's final build
//!    statement to run under `codeql database create`.
//! 3. **Build** (skip with `--no-build`): build each package sequentially,
//!    which generates its CodeQL database.
//!
//! When nothing was downloaded or named, the package list is every package
//! directory already in the working directory.
//!
//! ## Examples
//!
//! ```bash
//! # Fetch 5 random packages, rewrite them, build them
//! archquery run
//!
//! # Re-run modify and build over what is already checked out
//! archquery run --no-download
//!
//! # Only rewrite recipes, do not build
//! archquery run --no-download --no-build
//! ```
//!
use crate::commands::{build, fetch, modify, packages_or_working_directory};
use crate::common::fs::io;
use crate::common::system::tools;
use crate::core::{config::Config, error::Result};
use clap::Parser;
use tracing::{debug, info};

/// Arguments for `archquery run`.
#[derive(Parser, Debug)]
#[command(about = "Download, modify, and build packages to generate CodeQL databases")]
pub struct RunArgs {
    /// Don't download new recipes.
    #[arg(long)]
    no_download: bool,

    /// How many packages to download (default: `selection.default_count`).
    #[arg(long, conflicts_with_all = ["no_download", "packages"])]
    package_count: Option<usize>,

    /// Don't modify recipes.
    #[arg(long)]
    no_modify: bool,

    /// Don't build packages / CodeQL databases.
    #[arg(long)]
    no_build: bool,

    /// Specific packages to process instead of a random selection.
    packages: Vec<String>,
}

/// Handler for `archquery run`.
pub async fn handle_run(args: RunArgs, config: &Config) -> Result<()> {
    debug!("Run args: {:?}", args);
    io::ensure_dir_exists(&config.working_dir())?;

    let mut packages = args.packages;
    if !args.no_download {
        tools::ensure_executables(&config.selection.required_executables)?;
        packages = fetch::download(config, packages, args.package_count).await?;
    }
    let packages = packages_or_working_directory(config, packages)?;
    info!("Processing {} packages", packages.len());

    if !args.no_modify {
        info!("Modifying recipes");
        let report = modify::modify_packages(config, &packages)?;
        print!("{}", report.render());
    }
    if !args.no_build {
        info!("Building recipes and databases");
        build::warn_if_sudo_prompts().await;
        let report = build::build_packages(config, &packages).await?;
        print!("{}", report.render());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_run_args_defaults() {
        let args = RunArgs::try_parse_from(["run"]).unwrap();
        assert!(!args.no_download && !args.no_modify && !args.no_build);
        assert_eq!(args.package_count, None);
    }

    #[test]
    fn test_package_count_conflicts_with_no_download() {
        let result = RunArgs::try_parse_from(["run", "--no-download", "--package-count", "3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_package_count_conflicts_with_named_packages() {
        let result = RunArgs::try_parse_from(["run", "--package-count", "3", "zlib"]);
        assert!(result.is_err());
        let args = RunArgs::try_parse_from(["run", "zlib", "nano"]).unwrap();
        assert_eq!(args.packages, vec!["zlib", "nano"]);
    }

    #[tokio::test]
    async fn test_run_modify_only_over_working_directory() -> Result<()> {
        let dir = tempdir()?;
        let config = Config {
            working_directory: dir.path().to_string_lossy().into_owned(),
            ..Default::default()
        };
        for (pkg, body) in [
            ("zlib", "build() {\n  make\n}\n"),
            ("rusty", "build() {\n  cargo build\n}\n"),
        ] {
            let recipe = config.recipe_path(pkg);
            fs::create_dir_all(recipe.parent().unwrap())?;
            fs::write(recipe, body)?;
        }
        fs::create_dir_all(config.database_dir())?;

        let args = RunArgs::try_parse_from(["run", "--no-download", "--no-build"]).unwrap();
        handle_run(args, &config).await?;

        assert!(fs::read_to_string(config.recipe_path("zlib"))?.contains("database create"));
        assert_eq!(
            fs::read_to_string(config.recipe_path("rusty"))?,
            "build() {\n  cargo build\n}\n"
        );
        Ok(())
    }
}
