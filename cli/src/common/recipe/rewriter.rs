//! # Command Rewriter (`common::recipe::rewriter`)
//!
//! File: cli/src/common/recipe/rewriter.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Turns a classified build command into the equivalent command wrapped by the
//! analysis tool:
//!
//! ```text
//! make all
//!   ->
//! /home/me/ql/codeql/codeql database create --language=cpp --command="make all" /home/me/.archquerywork/codeql_databases/zlib
//! ```
//!
//! The original command is trimmed and inserted verbatim. The produced line
//! always ends in `\n`, so swapping it in keeps the recipe's line count.
//!
use crate::common::recipe::classifier::ClassifiedCommand;
use std::path::PathBuf;

/// Produces wrapped command lines for one analysis tool and database root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRewriter {
    tool: PathBuf,
    database_dir: PathBuf,
}

impl CommandRewriter {
    pub fn new(tool: impl Into<PathBuf>, database_dir: impl Into<PathBuf>) -> Self {
        Self {
            tool: tool.into(),
            database_dir: database_dir.into(),
        }
    }

    /// Directory a package's database is written to.
    pub fn database_path(&self, package: &str) -> PathBuf {
        self.database_dir.join(package)
    }

    /// Builds the replacement for `line`.
    ///
    /// Returns `None` when `class` has no analysis language (`Unknown` or
    /// `None`); the caller reports the recipe as unclassified.
    pub fn rewrite(&self, class: ClassifiedCommand, line: &str, package: &str) -> Option<String> {
        let language = class.language()?;
        Some(format!(
            "{} database create --language={} --command=\"{}\" {}\n",
            self.tool.display(),
            language,
            line.trim(),
            self.database_path(package).display()
        ))
    }
}
