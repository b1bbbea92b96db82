//! # archquery Recipe Rewriting (`common::recipe`)
//!
//! File: cli/src/common/recipe/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Everything needed to rewrite a PKGBUILD so that its final build command
//! runs under `codeql database create`. The submodules are layered leaf-first:
//!
//! - **`locator`**: finds the start/end lines of a named function block.
//! - **`classifier`**: maps one line to `None`, `CCpp`, `Python`, or `Unknown` using an ordered rule table.
//! - **`rewriter`**: builds the wrapped replacement line for a classified command.
//! - **`guard`**: detects recipes that were already rewritten.
//! - **`engine`**: composes the above over one recipe file and decides whether to persist it.
//!
//! `Recipe` itself is just the file's lines with their newline terminators
//! kept, so joining them back reproduces the original bytes exactly.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::recipe::engine::{RecipeEngine, RewriteOutcome};
//!
//! let engine = RecipeEngine::from_config(&cfg)?;
//! match engine.rewrite_file("zlib", &cfg.recipe_path("zlib"))? {
//!     RewriteOutcome::Rewritten { .. } => println!("zlib rewritten"),
//!     other => println!("zlib skipped: {}", other),
//! }
//! ```
//!

pub mod classifier;
pub mod engine;
pub mod guard;
pub mod locator;
pub mod rewriter;

/// A recipe file held in memory as lines, each keeping its `\n` terminator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Recipe {
    lines: Vec<String>,
}

impl Recipe {
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.split_inclusive('\n').map(str::to_string).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Replaces the line at `index`. Out-of-range indices are ignored.
    pub fn replace_line(&mut self, index: usize, line: String) {
        if let Some(slot) = self.lines.get_mut(index) {
            *slot = line;
        }
    }

    pub fn to_text(&self) -> String {
        self.lines.concat()
    }
}
