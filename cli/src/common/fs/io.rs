//! # archquery Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module centralizes the filesystem operations archquery needs, wrapping
//! `std::fs` with `anyhow::Context` so failures name the path involved.
//!
//! ## Architecture
//!
//! - **`ensure_dir_exists`**: Creates a directory (and parents) if missing; fails if the path is a file.
//! - **`read_file_to_string`**: Reads a whole file, adding the path to any error.
//! - **`replace_file_contents`**: Replaces a file's contents all-or-nothing by writing a sibling temporary file and renaming it over the target. Readers never observe a half-written recipe.
//! - **`list_subdirectories`**: Lists the names of the immediate subdirectories of a directory (via `walkdir`), sorted, skipping hidden and excluded names.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::io;
//!
//! # fn run_example() -> Result<()> {
//! let recipe = Path::new("/work/zlib/trunk/PKGBUILD");
//! let text = io::read_file_to_string(recipe)?;
//! io::replace_file_contents(recipe, &text.replace("make", "ninja"))?;
//! let packages = io::list_subdirectories(Path::new("/work"), &["codeql_databases"])?;
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{ArchqueryError, Result};
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Ensures that a directory exists at the specified path.
///
/// If the path does not exist, the directory is created along with any missing
/// parents (similar to `mkdir -p`).
///
/// # Errors
///
/// Returns an `Err` if:
/// - The path exists but is not a directory.
/// - Creating the directory fails (e.g., due to permissions).
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(ArchqueryError::FileSystem(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Reads the entire content of a file into a string.
///
/// # Errors
///
/// Returns an `Err` if the file cannot be found, opened, or read, with context
/// indicating which file failed.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
}

/// Replaces the contents of an existing file in one step.
///
/// The new content is written to `<file name>.archquery-tmp` in the same
/// directory and then renamed over `path`. On any failure the temporary file
/// is removed and `path` keeps its previous contents.
///
/// # Errors
///
/// Returns an `Err` if `path` has no file name, or if writing or renaming fails.
pub fn replace_file_contents(path: &Path, content: &str) -> Result<()> {
    let temp_path = temp_sibling(path)?;
    if let Err(e) = fs::write(&temp_path, content) {
        let _ = fs::remove_file(&temp_path);
        return Err(e).with_context(|| format!("Failed to write temporary file {:?}", temp_path));
    }
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e).with_context(|| format!("Failed to replace file {:?}", path));
    }
    debug!("Replaced contents of {:?}", path);
    Ok(())
}

fn temp_sibling(path: &Path) -> Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        ArchqueryError::FileSystem(format!("Path has no file name: {:?}", path))
    })?;
    let mut temp_name = file_name.to_os_string();
    temp_name.push(".archquery-tmp");
    Ok(path.with_file_name(temp_name))
}

/// Lists the names of the immediate subdirectories of `root`, sorted by name.
///
/// Hidden entries and entries whose name appears in `exclude` are skipped, as
/// are names that are not valid UTF-8 (package names always are).
///
/// # Errors
///
/// Returns an `Err` if `root` cannot be read.
pub fn list_subdirectories(root: &Path, exclude: &[&str]) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to list directory {:?}", root))?;
        if !entry.file_type().is_dir() {
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) if !name.starts_with('.') && !exclude.contains(&name) => {
                names.push(name.to_string())
            }
            Some(_) => {}
            None => debug!("Skipping non UTF-8 directory name: {:?}", entry.path()),
        }
    }
    names.sort();
    Ok(names)
}
