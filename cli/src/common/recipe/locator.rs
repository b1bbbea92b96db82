//! # Function-Block Locator (`common::recipe::locator`)
//!
//! File: cli/src/common/recipe/locator.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Finds a named shell function inside a recipe's lines. This is structural
//! marker detection, not parsing: the opener is a line of the form
//! `name() {` (whitespace-tolerant around the parentheses and brace) and the
//! block ends at the first later line that trims to `}`. Nested braces are
//! not tracked; recipes close their functions on a line of their own.
//!
//! ```text
//! 0  pkgname=zlib
//! 1  build() {          <- start_index
//! 2    cd "$pkgname"
//! 3    make all         <- final statement (end_index - 1)
//! 4  }                  <- end_index
//! ```
//!
use crate::core::error::Result;
use anyhow::Context;
use regex::Regex;
use tracing::debug;

/// Line range of a located function. `start_index` is the opener line and
/// `end_index` the closing-brace line, so `start_index < end_index` always.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionBlock {
    pub start_index: usize,
    pub end_index: usize,
}

impl FunctionBlock {
    /// Index of the line right before the closing brace.
    ///
    /// Returns `None` for an empty body, where that line would be the opener.
    pub fn final_statement_index(&self) -> Option<usize> {
        let candidate = self.end_index - 1;
        (candidate > self.start_index).then_some(candidate)
    }
}

/// Locates one named function. Build it once and reuse it across recipes.
#[derive(Debug, Clone)]
pub struct FunctionLocator {
    name: String,
    opener: Regex,
}

impl FunctionLocator {
    pub fn new(name: &str) -> Result<Self> {
        let pattern = format!(r"^\s*{}\s*\(\s*\)\s*\{{\s*$", regex::escape(name));
        let opener = Regex::new(&pattern)
            .with_context(|| format!("Failed to build opener pattern for function '{}'", name))?;
        Ok(Self {
            name: name.to_string(),
            opener,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scans `lines` top to bottom for the function.
    ///
    /// Returns `None` when no opener matches, or when an opener matches but no
    /// closing-brace line follows it before the end of the recipe.
    pub fn locate<S: AsRef<str>>(&self, lines: &[S]) -> Option<FunctionBlock> {
        let start_index = lines
            .iter()
            .position(|line| self.opener.is_match(line.as_ref()))?;

        let end_index = lines[start_index + 1..]
            .iter()
            .position(|line| line.as_ref().trim() == "}")
            .map(|offset| start_index + 1 + offset);

        match end_index {
            Some(end_index) => {
                debug!(
                    "{}() spans lines {}..={}",
                    self.name, start_index, end_index
                );
                Some(FunctionBlock {
                    start_index,
                    end_index,
                })
            }
            None => {
                debug!(
                    "{}() opens at line {} but is never closed",
                    self.name, start_index
                );
                None
            }
        }
    }
}
