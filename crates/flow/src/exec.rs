//! External command invocation.
//!
//! This module abstracts process spawning behind a trait so the orchestrator's
//! branching logic can be unit-tested with scripted runners. It provides:
//! 1. **`CommandOutput`:** Structured result of one invocation (status, captured streams).
//! 2. **`CommandRunner`:** The seam the flow drives tools through.
//! 3. **`SystemRunner`:** The production implementation backed by `std::process`.

use std::process::Command;

use crate::common::FlowError;

/// Outcome of a single external command invocation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit status reported by the tool (`-1` when terminated by a signal).
    pub status: i32,
    /// Captured standard output, lossily decoded.
    pub stdout: String,
    /// Captured standard error, lossily decoded.
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the invocation exited with status zero.
    #[inline]
    pub const fn success(&self) -> bool {
        self.status == 0
    }
}

/// Seam through which the flow invokes external tools.
///
/// Implementations block until the command exits and return a structured
/// [`CommandOutput`]. A launch failure (tool missing, permission denied)
/// surfaces as [`FlowError::Spawn`]; a non-zero exit status is *not* an error
/// at this layer — the caller decides whether it is fatal.
pub trait CommandRunner {
    /// Runs `program` with `args`, blocking until completion.
    fn run(&mut self, program: &str, args: &[String]) -> Result<CommandOutput, FlowError>;
}

/// Production runner backed by [`std::process::Command`].
///
/// Output is captured rather than inherited: the simulator writes its own
/// transcript via `-logfile`, and captured stderr feeds phase-failure
/// diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, program: &str, args: &[String]) -> Result<CommandOutput, FlowError> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| FlowError::Spawn {
                program: program.to_string(),
                source,
            })?;

        Ok(CommandOutput {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
