//! # Recipe Rewrite Engine (`common::recipe::engine`)
//!
//! File: cli/src/common/recipe/engine.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Applies the locator, guard, classifier, and rewriter to one recipe file.
//!
//! ## Workflow
//!
//! 1. Load the recipe into memory as lines (newlines kept).
//! 2. Locate the configured function (`build` by default). Not found, never
//!    closed, or an empty body all yield `BlockNotFound`.
//! 3. Take the final statement, the line right before the closing brace.
//! 4. If it already carries the analysis-tool marker, yield `AlreadyModified`.
//! 5. Classify it. Lines without an analysis language yield `UnclassifiedCommand`.
//! 6. Replace that single line and write the whole recipe back in one step.
//!
//! Steps 2-5 leave the file untouched. Only step 6 writes, and it either
//! replaces the file completely or not at all.
//!
use crate::common::fs::io;
use crate::common::recipe::{
    classifier::classify,
    guard::already_modified,
    locator::FunctionLocator,
    rewriter::CommandRewriter,
    Recipe,
};
use crate::core::{config::Config, error::Result};
use std::fmt;
use std::path::Path;
use tracing::{debug, error, warn};

/// Result of attempting to rewrite one recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// The final statement at `line_index` was replaced by `new_line`.
    Rewritten { line_index: usize, new_line: String },
    /// The final statement already invokes the analysis tool.
    AlreadyModified,
    /// The function is missing, unterminated, or has an empty body.
    BlockNotFound,
    /// The final statement is not a command we know how to wrap.
    UnclassifiedCommand,
}

impl RewriteOutcome {
    pub fn is_rewritten(&self) -> bool {
        matches!(self, RewriteOutcome::Rewritten { .. })
    }
}

impl fmt::Display for RewriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteOutcome::Rewritten { line_index, .. } => {
                write!(f, "rewrote line {}", line_index + 1)
            }
            RewriteOutcome::AlreadyModified => f.write_str("already modified"),
            RewriteOutcome::BlockNotFound => f.write_str("function block not found"),
            RewriteOutcome::UnclassifiedCommand => f.write_str("unclassified build command"),
        }
    }
}

/// Rewrites recipes for one function name, analysis tool, and database root.
#[derive(Debug, Clone)]
pub struct RecipeEngine {
    locator: FunctionLocator,
    rewriter: CommandRewriter,
    marker: String,
}

impl RecipeEngine {
    pub fn new(locator: FunctionLocator, rewriter: CommandRewriter, marker: impl Into<String>) -> Self {
        Self {
            locator,
            rewriter,
            marker: marker.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let locator = FunctionLocator::new(&config.recipe.function)?;
        let rewriter = CommandRewriter::new(config.analysis_tool(), config.database_dir());
        Ok(Self::new(locator, rewriter, config.analysis.marker.clone()))
    }

    /// Rewrites `recipe` in memory. The recipe is only changed when the
    /// outcome is `Rewritten`.
    pub fn rewrite_recipe(&self, recipe: &mut Recipe, package: &str) -> RewriteOutcome {
        let block = match self.locator.locate(recipe.lines()) {
            Some(block) => block,
            None => return RewriteOutcome::BlockNotFound,
        };
        let line_index = match block.final_statement_index() {
            Some(index) => index,
            None => {
                debug!("{}() in {} has an empty body", self.locator.name(), package);
                return RewriteOutcome::BlockNotFound;
            }
        };
        let current = &recipe.lines()[line_index];

        if already_modified(current, &self.marker) {
            return RewriteOutcome::AlreadyModified;
        }

        let class = classify(current);
        let new_line = match self.rewriter.rewrite(class, current, package) {
            Some(line) => line,
            None => {
                debug!("Line {:?} classified as {}", current, class);
                return RewriteOutcome::UnclassifiedCommand;
            }
        };

        debug!("For package: {}", package);
        debug!("{}() started at: {}", self.locator.name(), block.start_index);
        debug!("{}() ended at: {}", self.locator.name(), block.end_index);
        debug!("Modified line {} ({})", line_index, class);
        debug!("To become: {}", new_line.trim_end());

        recipe.replace_line(line_index, new_line.clone());
        RewriteOutcome::Rewritten {
            line_index,
            new_line,
        }
    }

    /// Loads the recipe at `path`, rewrites it, and persists it on success.
    ///
    /// # Errors
    ///
    /// Only I/O failures are errors. Every non-rewritten outcome leaves the
    /// file byte-identical and is returned as `Ok`.
    pub fn rewrite_file(&self, package: &str, path: &Path) -> Result<RewriteOutcome> {
        let text = io::read_file_to_string(path)?;
        let mut recipe = Recipe::parse(&text);
        debug!("Read {} lines from {}", recipe.line_count(), path.display());
        let outcome = self.rewrite_recipe(&mut recipe, package);

        match &outcome {
            RewriteOutcome::Rewritten { .. } => {
                io::replace_file_contents(path, &recipe.to_text())?;
            }
            RewriteOutcome::AlreadyModified => {
                warn!(
                    "Recipe for {} seems to have already been modified ({})",
                    package,
                    path.display()
                );
            }
            RewriteOutcome::BlockNotFound => {
                error!(
                    "Could not find {}() function for {} in {}",
                    self.locator.name(),
                    package,
                    path.display()
                );
            }
            RewriteOutcome::UnclassifiedCommand => {
                error!(
                    "Package {}: don't know which language the last line of {}() is",
                    package,
                    self.locator.name()
                );
            }
        }
        Ok(outcome)
    }
}
