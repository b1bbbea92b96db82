//! # archquery Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Thin wrappers around `tokio::process::Command` for the external tools
//! archquery drives (`sudo`, `pacman`, `asp`, `makepkg`).
//!
//! ## Architecture
//!
//! - **`ExternalCommand`**: program, arguments, and optional working directory, with a readable `Display`.
//! - **`capture`**: runs a command and returns its output regardless of exit status.
//! - **`run_checked`**: runs a command with inherited stdio and turns a non-zero exit into `ArchqueryError::ExternalCommand`.
//! - **`run_logged`**: runs a command with stdout and stderr appended to an already-open log file.
//! - **`run_all`**: spawns many commands at once and waits for all of them (the fetch fan-out).
//!
//! There are no timeouts. A hung child blocks its caller until it exits.
//!
use crate::core::error::{ArchqueryError, Result};
use anyhow::Context;
use futures_util::future::join_all;
use std::fmt;
use std::fs::File;
use std::path::PathBuf;
use std::process::{ExitStatus, Output, Stdio};
use tokio::process::Command;
use tracing::debug;

/// An external program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl ExternalCommand {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    /// Builds a command from a `[program, args...]` vector.
    pub fn from_argv(argv: &[String]) -> Result<Self> {
        let (program, args) = argv.split_first().ok_or_else(|| {
            ArchqueryError::ArgumentParsing("command line cannot be empty".to_string())
        })?;
        Ok(Self::new(program, args.iter().cloned()))
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.cwd {
            command.current_dir(dir);
        }
        command
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs `cmd` to completion, capturing stdout and stderr.
pub async fn capture(cmd: &ExternalCommand) -> Result<Output> {
    debug!("Capturing output of: {}", cmd);
    cmd.to_command()
        .stdin(Stdio::null())
        .output()
        .await
        .with_context(|| format!("Failed to execute '{}'", cmd))
}

/// Runs `cmd` with inherited stdio and fails on a non-zero exit status.
pub async fn run_checked(cmd: &ExternalCommand) -> Result<()> {
    debug!("Running: {}", cmd);
    let status = cmd
        .to_command()
        .status()
        .await
        .with_context(|| format!("Failed to execute '{}'", cmd))?;
    if !status.success() {
        anyhow::bail!(ArchqueryError::ExternalCommand {
            cmd: cmd.to_string(),
            status: status.to_string(),
            output: String::new(),
        });
    }
    Ok(())
}

/// Runs `cmd` with stdout and stderr appended to `log`. The log handle is
/// dropped (closed) when this returns.
pub async fn run_logged(cmd: &ExternalCommand, log: File) -> Result<ExitStatus> {
    debug!("Running with output to log: {}", cmd);
    let stderr_log = log
        .try_clone()
        .context("Failed to duplicate build log handle")?;
    cmd.to_command()
        .stdin(Stdio::null())
        .stdout(Stdio::from(log))
        .stderr(Stdio::from(stderr_log))
        .status()
        .await
        .with_context(|| format!("Failed to execute '{}'", cmd))
}

/// Spawns every command at once and waits for all of them to finish.
///
/// Results come back in input order. A command that cannot be spawned yields
/// an `Err` in its slot; the others still run.
pub async fn run_all(cmds: &[ExternalCommand]) -> Vec<Result<ExitStatus>> {
    let mut pending = Vec::with_capacity(cmds.len());
    for cmd in cmds {
        debug!("Spawning: {}", cmd);
        let spawned = cmd
            .to_command()
            .stdin(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to spawn '{}'", cmd));
        pending.push(async move {
            let mut child = spawned?;
            let status = child
                .wait()
                .await
                .with_context(|| format!("Failed to wait for '{}'", cmd))?;
            Ok::<ExitStatus, anyhow::Error>(status)
        });
    }
    join_all(pending).await
}
