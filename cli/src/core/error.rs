//! # archquery Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error types used throughout archquery. It follows
//! the same split as the rest of the crate:
//! - `ArchqueryError`: a `thiserror` enum for failures we want to name and match on
//! - `Result<T>`: an alias for `anyhow::Result<T>` so callers can attach context
//!
//! Recipe-level outcomes such as "build() not found" or "already modified" are
//! *not* errors. They are returned as `RewriteOutcome` values by the recipe
//! engine and turned into per-package entries of a batch report. Only failures
//! that stop a command (bad configuration, missing executables, I/O on shared
//! resources) flow through this module.
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if !path.is_dir() {
//!     anyhow::bail!(ArchqueryError::FileSystem(format!("Not a directory: {}", path.display())));
//! }
//!
//! // Add context to errors using anyhow
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read recipe: {}", path.display()))?;
//! ```
//!
use thiserror::Error;

/// Custom error type for archquery.
#[derive(Error, Debug)]
pub enum ArchqueryError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("External command failed: {cmd}, Status: {status}, Output:\n{output}")]
    ExternalCommand {
        cmd: String,
        status: String,
        output: String,
    },

    #[error("Required executables not found on PATH: {}", .0.join(", "))]
    MissingExecutables(Vec<String>),

    #[error("Argument parsing error: {0}")]
    ArgumentParsing(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
