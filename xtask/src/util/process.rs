//! Subprocess execution.
//!
//! Every task spawns external tools through a [`Runner`] so the sequence of commands can be
//! observed in tests without touching git, make or the map compilers.

use anyhow::{Context, Result};
use std::process::{Command, Stdio};

/// A child process exited unsuccessfully.
#[derive(Debug, thiserror::Error)]
#[error("`{command}` failed with {}", status_text(.code))]
pub struct CommandFailed {
    pub command: String,
    /// `None` when the child was terminated by a signal.
    pub code: Option<i32>,
}

fn status_text(code: &Option<i32>) -> String {
    match *code {
        Some(c) => format!("exit status {c}"),
        None => "no exit status (terminated by signal)".to_string(),
    }
}

pub trait Runner {
    /// Run to completion with inherited stdio (unless the caller redirected it).
    fn run(&mut self, cmd: &mut Command) -> Result<()>;

    /// Run to completion and return stdout.
    fn capture(&mut self, cmd: &mut Command) -> Result<String>;
}

/// Spawns real processes.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&mut self, cmd: &mut Command) -> Result<()> {
        let shown = describe(cmd);
        log::debug!("$ {shown}");
        let status = cmd
            .status()
            .with_context(|| format!("Spawning `{shown}`"))?;
        if !status.success() {
            return Err(CommandFailed {
                command: shown,
                code: status.code(),
            }
            .into());
        }
        Ok(())
    }

    fn capture(&mut self, cmd: &mut Command) -> Result<String> {
        let shown = describe(cmd);
        log::debug!("$ {shown}");
        let out = cmd
            .stderr(Stdio::inherit())
            .output()
            .with_context(|| format!("Running `{shown}`"))?;
        if !out.status.success() {
            return Err(CommandFailed {
                command: shown,
                code: out.status.code(),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&out.stdout).to_string())
    }
}

/// Render a command line for logs and error messages.
pub fn describe(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|s| s.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Process exit code for a failed run: the failing tool's own status when there is one.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|e| e.downcast_ref::<CommandFailed>())
        .and_then(|failed| failed.code)
        .and_then(|c| u8::try_from(c).ok())
        .filter(|c| *c != 0)
        .unwrap_or(1)
}
