//! # Executable Checks (`common::system::tools`)
//!
//! File: cli/src/common/system/tools.rs
//! Author: Christi Mahu
//!
use crate::core::error::{ArchqueryError, Result};
use tracing::debug;

/// Returns the subset of `names` that cannot be found on PATH, in input order.
pub fn find_missing_executables(names: &[String]) -> Vec<String> {
    names
        .iter()
        .filter(|name| match which::which(name.as_str()) {
            Ok(path) => {
                debug!("Found '{}' at {}", name, path.display());
                false
            }
            Err(e) => {
                debug!("'{}' not found: {}", name, e);
                true
            }
        })
        .cloned()
        .collect()
}

/// Fails with `ArchqueryError::MissingExecutables` if any of `names` is missing.
pub fn ensure_executables(names: &[String]) -> Result<()> {
    let missing = find_missing_executables(names);
    if !missing.is_empty() {
        anyhow::bail!(ArchqueryError::MissingExecutables(missing));
    }
    Ok(())
}
