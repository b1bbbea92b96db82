//! # archquery Modify Command
//!
//! File: cli/src/commands/modify.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `archquery modify`, which rewrites the recipe of each package so
//! that the last statement of its `build()` function runs under
//! `codeql database create`. Packages are processed one at a time; a recipe
//! that cannot be rewritten is reported and the rest carry on.
//!
//! ## Examples
//!
//! ```bash
//! # Rewrite every package checked out in the working directory
//! archquery modify
//!
//! # Rewrite two specific packages
//! archquery modify zlib nano
//! ```
//!
use crate::commands::packages_or_working_directory;
use crate::common::batch::{self, BatchReport};
use crate::common::recipe::engine::RecipeEngine;
use crate::core::{config::Config, error::Result};
use clap::Parser;
use tracing::{debug, info};

/// Arguments for `archquery modify`.
#[derive(Parser, Debug)]
#[command(about = "Rewrite package recipes to generate CodeQL databases")]
pub struct ModifyArgs {
    /// Packages to modify (default: every package directory in the working directory).
    packages: Vec<String>,
}

/// Handler for `archquery modify`.
pub async fn handle_modify(args: ModifyArgs, config: &Config) -> Result<()> {
    debug!("Modify args: {:?}", args);
    let packages = packages_or_working_directory(config, args.packages)?;
    let report = modify_packages(config, &packages)?;
    print!("{}", report.render());
    Ok(())
}

/// Runs the modify phase over `packages` and returns its report.
pub(crate) fn modify_packages(config: &Config, packages: &[String]) -> Result<BatchReport> {
    info!("Modifying {} recipes", packages.len());
    let engine = RecipeEngine::from_config(config)?;
    Ok(batch::run_modify_phase(
        &engine,
        &batch::batch_items(config, packages),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_modify_args_parsing() {
        let args = ModifyArgs::try_parse_from(["modify"]).unwrap();
        assert!(args.packages.is_empty());

        let args = ModifyArgs::try_parse_from(["modify", "zlib", "nano"]).unwrap();
        assert_eq!(args.packages, vec!["zlib", "nano"]);
    }

    #[test]
    fn test_modify_packages_uses_config_layout() -> Result<()> {
        let dir = tempdir()?;
        let config = Config {
            working_directory: dir.path().to_string_lossy().into_owned(),
            ..Default::default()
        };
        let recipe = config.recipe_path("zlib");
        fs::create_dir_all(recipe.parent().unwrap())?;
        fs::write(&recipe, "build() {\n  make\n}\n")?;

        let report = modify_packages(&config, &["zlib".to_string()])?;
        assert_eq!(report.successes(), vec!["zlib"]);

        let expected_db = config.database_dir().join("zlib");
        assert!(fs::read_to_string(&recipe)?.contains(&expected_db.display().to_string()));
        Ok(())
    }
}
