//! # archquery Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared functionality used by the command handlers, kept separate from
//! command-specific argument handling (`commands::`) and core infrastructure
//! (`core::`).
//!
//! - **`recipe`**: locating, classifying, and rewriting the build step of a recipe.
//! - **`batch`**: running the modify and build phases over many packages with per-item failure isolation.
//! - **`packages`**: package selection, `pacman` sync, and concurrent `asp` checkouts.
//! - **`process`**: wrappers for running external programs.
//! - **`system`**: executable and sudo checks.
//! - **`fs`**: filesystem helpers.
//!
//! ```rust
//! use crate::common::{batch, recipe::engine::RecipeEngine};
//!
//! let engine = RecipeEngine::from_config(&cfg)?;
//! let report = batch::run_modify_phase(&engine, &batch::batch_items(&cfg, &packages));
//! print!("{}", report.render());
//! ```
//!

/// Sequential modify/build phases and their reports.
pub mod batch;
/// Filesystem operations (I/O, directory listing).
pub mod fs;
/// Package selection and recipe checkout.
pub mod packages;
/// External process execution.
pub mod process;
/// Recipe rewriting engine.
pub mod recipe;
/// Host checks (executables, sudo).
pub mod system;
