//! # archquery Batch Orchestrator (`common::batch`)
//!
//! File: cli/src/common/batch.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Runs the two per-package phases over a list of packages and collects the
//! outcome of each one into a `BatchReport`:
//!
//! - **Modify**: rewrite each recipe with the `RecipeEngine`.
//! - **Build**: run the build command (`makepkg ...` by default) in each recipe's directory,
//!   with all output appended to one shared build log.
//!
//! ## Architecture
//!
//! Both phases are plain sequential loops. The build command drives pacman,
//! whose database lock does not tolerate concurrent callers, so items are never
//! run in parallel. A failing item is recorded and the loop moves on; a phase
//! never stops early because of one package. The build log is opened in append
//! mode per item and closed before the next item starts.
//!
//! The build step is behind the `PackageBuilder` trait so the orchestration can
//! be exercised without `makepkg`.
//!
use crate::common::fs::io;
use crate::common::process::{self, ExternalCommand};
use crate::common::recipe::engine::{RecipeEngine, RewriteOutcome};
use crate::core::config::Config;
use crate::core::error::Result;
use anyhow::Context;
use std::fmt::Write as _;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use tracing::{error, info, warn};

/// Which per-package phase a report describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Modify,
    Build,
}

/// One package and the recipe it is processed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub package_id: String,
    pub recipe_path: PathBuf,
}

impl BatchItem {
    /// Directory containing the recipe; builds run here.
    pub fn recipe_dir(&self) -> &Path {
        self.recipe_path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Builds the item list for `packages` using the configured recipe layout.
pub fn batch_items(config: &Config, packages: &[String]) -> Vec<BatchItem> {
    packages
        .iter()
        .map(|pkg| BatchItem {
            package_id: pkg.clone(),
            recipe_path: config.recipe_path(pkg),
        })
        .collect()
}

/// What happened to one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Success,
    /// Nothing to do (the recipe was already rewritten). Not a failure.
    Skipped(String),
    Failure(String),
}

/// Outcomes of one phase, in processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub phase: Phase,
    pub outcomes: Vec<(String, ItemOutcome)>,
}

impl BatchReport {
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, package: &str, outcome: ItemOutcome) {
        self.outcomes.push((package.to_string(), outcome));
    }

    pub fn failures(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, ItemOutcome::Failure(_)))
            .map(|(pkg, _)| pkg.as_str())
            .collect()
    }

    pub fn skipped(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, ItemOutcome::Skipped(_)))
            .map(|(pkg, _)| pkg.as_str())
            .collect()
    }

    pub fn successes(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == ItemOutcome::Success)
            .map(|(pkg, _)| pkg.as_str())
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures().is_empty()
    }

    /// Logs the success and failure counts of the phase.
    pub fn log_summary(&self) {
        let succeeded = self.successes().len();
        if self.has_failures() {
            warn!(
                "{:?} phase: {} succeeded, {} failed",
                self.phase,
                succeeded,
                self.failures().len()
            );
        } else {
            info!("{:?} phase: {} succeeded, none failed", self.phase, succeeded);
        }
    }

    /// The end-of-phase summary printed to stdout.
    pub fn render(&self) -> String {
        let (title, failed_heading) = match self.phase {
            Phase::Modify => (
                "=== Modify process completed ===",
                "The following packages could not be modified:",
            ),
            Phase::Build => (
                "=== Build process completed ===",
                "The following packages failed to build:",
            ),
        };
        let mut out = String::new();
        let _ = writeln!(out, "{}", title);
        let failed: Vec<String> = self
            .outcomes
            .iter()
            .filter_map(|(pkg, outcome)| match outcome {
                ItemOutcome::Failure(reason) => Some(format!("{} ({})", pkg, reason)),
                _ => None,
            })
            .collect();
        append_list(&mut out, failed_heading, &failed);
        append_list(
            &mut out,
            "The following packages were already modified:",
            &self.skipped(),
        );
        out
    }
}

fn append_list<S: AsRef<str>>(out: &mut String, heading: &str, entries: &[S]) {
    if entries.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}", heading);
    for (i, entry) in entries.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, entry.as_ref());
    }
}

/// Rewrites every item's recipe, one after another.
pub fn run_modify_phase(engine: &RecipeEngine, items: &[BatchItem]) -> BatchReport {
    let mut report = BatchReport::new(Phase::Modify);
    for item in items {
        info!("Modifying recipe for {}", item.package_id);
        let outcome = match engine.rewrite_file(&item.package_id, &item.recipe_path) {
            Ok(outcome) if outcome.is_rewritten() => ItemOutcome::Success,
            Ok(RewriteOutcome::AlreadyModified) => {
                ItemOutcome::Skipped(RewriteOutcome::AlreadyModified.to_string())
            }
            Ok(other) => ItemOutcome::Failure(other.to_string()),
            Err(e) => {
                error!("Could not modify {}: {:#}", item.package_id, e);
                ItemOutcome::Failure(format!("{:#}", e))
            }
        };
        report.record(&item.package_id, outcome);
    }
    report.log_summary();
    report
}

/// Runs the external build for one item.
#[allow(async_fn_in_trait)]
pub trait PackageBuilder {
    /// Builds `item`, writing all output to `log`, and returns the exit status.
    async fn build(&self, item: &BatchItem, log: File) -> Result<ExitStatus>;
}

/// Builds by running a fixed command line inside the recipe directory.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    argv: Vec<String>,
}

impl CommandBuilder {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.build.command.clone())
    }
}

impl PackageBuilder for CommandBuilder {
    async fn build(&self, item: &BatchItem, log: File) -> Result<ExitStatus> {
        let cmd = ExternalCommand::from_argv(&self.argv)?.current_dir(item.recipe_dir());
        process::run_logged(&cmd, log).await
    }
}

/// Removes a leftover build log from a previous run.
fn reset_build_log(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove old build log {:?}", path)),
    }
}

fn open_log_for_item(path: &Path, package: &str) -> Result<File> {
    let mut log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open build log {:?}", path))?;
    writeln!(
        log,
        "=== {} | {} ===",
        package,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )
    .with_context(|| format!("Failed to write to build log {:?}", path))?;
    Ok(log)
}

/// Builds every item sequentially and records which ones failed.
///
/// # Errors
///
/// Only phase setup (removing the old log, creating the database directory)
/// can fail the phase. Per-item problems end up in the report.
pub async fn run_build_phase<B: PackageBuilder>(
    config: &Config,
    builder: &B,
    items: &[BatchItem],
) -> Result<BatchReport> {
    let log_path = config.build_log_path();
    reset_build_log(&log_path)?;
    io::ensure_dir_exists(&config.database_dir())?;

    let mut report = BatchReport::new(Phase::Build);
    for item in items {
        info!("Building and generating database for {}", item.package_id);
        let result = match open_log_for_item(&log_path, &item.package_id) {
            Ok(log) => builder.build(item, log).await,
            Err(e) => Err(e),
        };
        let outcome = match result {
            Ok(status) if status.success() => ItemOutcome::Success,
            Ok(status) => {
                warn!("Build of {} failed: {}", item.package_id, status);
                ItemOutcome::Failure(status.to_string())
            }
            Err(e) => {
                error!("Build of {} could not run: {:#}", item.package_id, e);
                ItemOutcome::Failure(format!("{:#}", e))
            }
        };
        report.record(&item.package_id, outcome);
    }
    report.log_summary();
    Ok(report)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::recipe::{locator::FunctionLocator, rewriter::CommandRewriter};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::os::unix::process::ExitStatusExt;
    use tempfile::{tempdir, TempDir};

    fn engine() -> RecipeEngine {
        RecipeEngine::new(
            FunctionLocator::new("build").unwrap(),
            CommandRewriter::new("/opt/ql/codeql/codeql", "/work/codeql_databases"),
            "codeql",
        )
    }

    fn config_for(dir: &TempDir) -> Config {
        Config {
            working_directory: dir.path().to_string_lossy().into_owned(),
            ..Default::default()
        }
    }

    fn write_recipe(config: &Config, package: &str, content: &str) {
        let path = config.recipe_path(package);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_modify_isolates_unclassified_items() {
        let dir = tempdir().unwrap();
        let config = config_for(&dir);
        let packages: Vec<String> = (1..=5).map(|i| format!("pkg{}", i)).collect();
        for (i, pkg) in packages.iter().enumerate() {
            let body = if i == 1 || i == 3 {
                "build() {\n  cargo build --release\n}\n"
            } else {
                "build() {\n  make all\n}\n"
            };
            write_recipe(&config, pkg, body);
        }

        let report = run_modify_phase(&engine(), &batch_items(&config, &packages));

        assert_eq!(report.failures(), vec!["pkg2", "pkg4"]);
        assert_eq!(report.successes(), vec!["pkg1", "pkg3", "pkg5"]);
        for pkg in ["pkg1", "pkg3", "pkg5"] {
            let text = fs::read_to_string(config.recipe_path(pkg)).unwrap();
            assert!(text.contains("database create --language=cpp"));
        }
        for pkg in ["pkg2", "pkg4"] {
            let text = fs::read_to_string(config.recipe_path(pkg)).unwrap();
            assert_eq!(text, "build() {\n  cargo build --release\n}\n");
        }
    }

    #[test]
    fn test_modify_records_missing_recipe_and_continues() {
        let dir = tempdir().unwrap();
        let config = config_for(&dir);
        write_recipe(&config, "present", "build() {\n  make\n}\n");
        let packages = vec!["missing".to_string(), "present".to_string()];

        let report = run_modify_phase(&engine(), &batch_items(&config, &packages));
        assert_eq!(report.failures(), vec!["missing"]);
        assert_eq!(report.successes(), vec!["present"]);
    }

    #[test]
    fn test_modify_twice_skips_already_modified() {
        let dir = tempdir().unwrap();
        let config = config_for(&dir);
        write_recipe(&config, "zlib", "build() {\n  make\n}\n");
        let items = batch_items(&config, &["zlib".to_string()]);

        assert_eq!(run_modify_phase(&engine(), &items).successes(), vec!["zlib"]);
        let second = run_modify_phase(&engine(), &items);
        assert_eq!(second.skipped(), vec!["zlib"]);
        assert!(!second.has_failures());
    }

    #[test]
    fn test_render_build_report() {
        let mut report = BatchReport::new(Phase::Build);
        report.record("a", ItemOutcome::Success);
        report.record("b", ItemOutcome::Failure("exit status: 2".into()));
        report.record("c", ItemOutcome::Failure("exit status: 1".into()));
        assert_eq!(
            report.render(),
            "=== Build process completed ===\nThe following packages failed to build:\n  1. b (exit status: 2)\n  2. c (exit status: 1)\n"
        );
    }

    #[test]
    fn test_render_clean_modify_report() {
        let mut report = BatchReport::new(Phase::Modify);
        report.record("a", ItemOutcome::Success);
        report.record("b", ItemOutcome::Skipped("already modified".into()));
        assert_eq!(
            report.render(),
            "=== Modify process completed ===\nThe following packages were already modified:\n  1. b\n"
        );
    }

    /// Returns scripted exit codes and remembers the order it was called in.
    struct ScriptedBuilder {
        codes: HashMap<String, i32>,
        calls: RefCell<Vec<String>>,
    }

    impl PackageBuilder for ScriptedBuilder {
        async fn build(&self, item: &BatchItem, mut log: File) -> Result<ExitStatus> {
            self.calls.borrow_mut().push(item.package_id.clone());
            writeln!(log, "building {}", item.package_id)?;
            let code = self.codes.get(&item.package_id).copied().unwrap_or(0);
            Ok(ExitStatus::from_raw(code << 8))
        }
    }

    #[tokio::test]
    async fn test_build_phase_records_failures_in_order() -> Result<()> {
        let dir = tempdir()?;
        let config = config_for(&dir);
        fs::write(config.build_log_path(), "stale output\n")?;
        let packages: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let builder = ScriptedBuilder {
            codes: HashMap::from([("b".to_string(), 2)]),
            calls: RefCell::new(Vec::new()),
        };

        let report = run_build_phase(&config, &builder, &batch_items(&config, &packages)).await?;

        assert_eq!(*builder.calls.borrow(), vec!["a", "b", "c"]);
        assert_eq!(report.failures(), vec!["b"]);
        assert!(config.database_dir().is_dir());
        let log = fs::read_to_string(config.build_log_path())?;
        assert!(!log.contains("stale output"));
        assert!(log.contains("building a\n"));
        assert!(log.find("building a").unwrap() < log.find("building c").unwrap());
        Ok(())
    }

    #[tokio::test]
    async fn test_command_builder_runs_in_recipe_dir() -> Result<()> {
        let dir = tempdir()?;
        let config = config_for(&dir);
        write_recipe(&config, "ok", "build() {\n  make\n}\n");
        write_recipe(&config, "bad", "build() {\n  make\n}\n");
        let builder = CommandBuilder::new(vec![
            "sh".to_string(),
            "-c".to_string(),
            "test -f PKGBUILD && basename \"$(dirname \"$PWD\")\" | grep -qx ok".to_string(),
        ]);
        let packages = vec!["ok".to_string(), "bad".to_string(), "absent".to_string()];

        let report = run_build_phase(&config, &builder, &batch_items(&config, &packages)).await?;
        assert_eq!(report.successes(), vec!["ok"]);
        assert_eq!(report.failures(), vec!["bad", "absent"]);
        Ok(())
    }
}
