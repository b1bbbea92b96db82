//! # archquery System Utilities Module (`common::system`)
//!
//! File: cli/src/common/system/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Host checks performed before a run:
//!
//! - **`tools`**: verifies that required executables (`asp`, `git`, `wget` by default) are on PATH.
//! - **`sudo`**: checks whether the current user may run `sudo` without a password. Builds install
//!   dependencies through `sudo pacman`, so a password prompt would stall a long batch.
//!
//! ```rust
//! use crate::common::system::{sudo, tools};
//!
//! tools::ensure_executables(&cfg.selection.required_executables)?;
//! if !sudo::passwordless_sudo().await? {
//!     tracing::warn!("sudo will prompt for a password during builds");
//! }
//! ```
//!

pub mod sudo;
pub mod tools;
