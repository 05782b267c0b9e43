//! Spawn the emulator with its explicit environment and guarantee teardown.
//!
//! The launcher stays alive for the emulator's whole lifetime: spawn, wait,
//! release the transient resource, propagate the exit code. Release runs
//! whatever the exit status was -- including when the spawn itself failed.

use anyhow::{Context, Result};
use std::process::Command;

use cxbxl_core::cleanup::CleanupGuard;
use cxbxl_core::command::LaunchCommand;

/// Run the command to completion and return the child's exit code.
pub fn run(command: LaunchCommand, guard: CleanupGuard) -> Result<i32> {
    let (program, args) = command
        .argv
        .split_first()
        .context("empty launch command")?;

    tracing::debug!("command: {:?}", command.argv);

    let status = Command::new(program)
        .args(args)
        .env_clear()
        .envs(&command.env)
        .status()
        .with_context(|| format!("Failed to run {}", program.to_string_lossy()));

    // Teardown is anchored to the emulator's termination, not to any
    // particular outcome of it
    guard.release();

    let status = status?;
    match status.code() {
        Some(code) => {
            if !status.success() {
                tracing::warn!("emulator exited with status {code}");
            }
            Ok(code)
        }
        None => {
            tracing::warn!("emulator terminated by signal");
            Ok(1)
        }
    }
}
