//! # Idempotency Guard (`common::recipe::guard`)
//!
//! File: cli/src/common/recipe/guard.rs
//! Author: Christi Mahu
//!
//! A recipe whose final build statement already mentions the analysis tool has
//! been rewritten before. Wrapping it again would nest one `database create`
//! inside another, so the engine checks this first and skips the recipe.

/// Returns `true` if `line` already carries the wrapper `marker`.
pub fn already_modified(line: &str, marker: &str) -> bool {
    line.contains(marker)
}
