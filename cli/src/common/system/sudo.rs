//! # Sudo Privilege Check (`common::system::sudo`)
//!
//! File: cli/src/common/system/sudo.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `makepkg --syncdeps` installs build dependencies through `sudo pacman`. If
//! the user needs a password for that, someone has to keep re-entering it
//! during a long batch. This module detects that situation up front.
//!
//! The check runs `sudo -n -l` (never prompting) and looks for the rule
//! `(ALL) NOPASSWD: ALL` among the listed privileges.
//!
use crate::common::process::{self, ExternalCommand};
use crate::core::error::Result;
use tracing::debug;

const PASSWORDLESS_RULE: &str = "(ALL) NOPASSWD: ALL";

/// Returns `true` if the `sudo -l` listing grants passwordless access to everything.
pub fn listing_allows_passwordless(listing: &str) -> bool {
    listing.lines().any(|line| line.trim() == PASSWORDLESS_RULE)
}

/// Asks `sudo` whether the current user may run any command without a password.
///
/// A non-zero exit (sudo wanted a password, or the user has no rights) is
/// reported as `false`. Only failing to run `sudo` at all is an error.
pub async fn passwordless_sudo() -> Result<bool> {
    let output = process::capture(&ExternalCommand::new("sudo", ["-n", "-l"])).await?;
    if !output.status.success() {
        debug!(
            "sudo -n -l exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return Ok(false);
    }
    Ok(listing_allows_passwordless(&String::from_utf8_lossy(
        &output.stdout,
    )))
}
