//! # archquery Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Entry point for filesystem helpers. Everything currently lives in `io`:
//! reading recipes, replacing them in one step, creating the database
//! directory, and listing package directories in the working directory.
//!
//! ```rust
//! use crate::common::fs::io;
//! io::ensure_dir_exists(&cfg.database_dir())?;
//! ```
//!

/// Basic file I/O operations (`ensure_dir_exists`, `read_file_to_string`, `replace_file_contents`, `list_subdirectories`).
pub mod io;
