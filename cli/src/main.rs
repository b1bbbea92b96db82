//! # archquery Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! archquery automates a repeatable experiment on Arch Linux packages: fetch a
//! sample of PKGBUILDs, rewrite each one so its final build command is wrapped
//! by `codeql database create`, then build them all and record which failed.
//!
//! This file handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Loading the configuration once and routing to the command handlers
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! archquery --help
//!
//! # Full run with progress logging
//! archquery -v run --package-count 10
//!
//! # Use a different working directory
//! archquery --workdir /srv/aq modify
//! ```
//!
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Handles specific command logic (run, fetch, modify, build, check)
mod common; // Shared utilities (recipe rewriting, batches, processes, fs)
mod core; // Core infrastructure (errors, config)

use crate::core::config::{self, ConfigOverrides};

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "archquery",
    about = "Generate CodeQL databases from Arch Linux PKGBUILDs",
    long_about = "Download PKGBUILDs, rewrite their build() step to run under \
                  `codeql database create`, and build them in a batch.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Working directory holding package checkouts and databases.
    #[arg(long, env = "ARCHQUERY_WORKDIR", global = true)]
    workdir: Option<PathBuf>,
    /// Directory CodeQL is installed in.
    #[arg(long, env = "ARCHQUERY_CODEQL_DIR", global = true)]
    codeql_dir: Option<PathBuf>,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    Run(commands::run::RunArgs),
    Fetch(commands::fetch::FetchArgs),
    #[command(alias = "m")]
    Modify(commands::modify::ModifyArgs),
    #[command(alias = "b")]
    Build(commands::build::BuildArgs),
    Check(commands::check::CheckArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let overrides = ConfigOverrides {
        working_directory: cli.workdir,
        codeql_dir: cli.codeql_dir,
    };
    let command_result = match config::load_config(&overrides) {
        Ok(cfg) => match cli.command {
            Commands::Run(args) => commands::run::handle_run(args, &cfg).await,
            Commands::Fetch(args) => commands::fetch::handle_fetch(args, &cfg).await,
            Commands::Modify(args) => commands::modify::handle_modify(args, &cfg).await,
            Commands::Build(args) => commands::build::handle_build(args, &cfg).await,
            Commands::Check(args) => commands::check::handle_check(args, &cfg).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
