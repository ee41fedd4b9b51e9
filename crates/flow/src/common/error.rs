//! Harness error definitions.
//!
//! This module defines the error type shared by every stage of the run flow.
//! It provides:
//! 1. **Missing-input errors:** No testbenches found, aborted interactive selection.
//! 2. **External-phase failures:** Tool launch failures and non-zero exit statuses.
//! 3. **Configuration and I/O errors:** Integrating with standard Rust error traits.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the run flow, the result analyzer, and their supporting
/// services.
///
/// Every fallible operation in the crate returns this type. The binary maps
/// any propagated `FlowError` to a failing process exit code; there is no
/// retry logic anywhere in the pipeline.
#[derive(Debug, Error)]
pub enum FlowError {
    /// No testbench sources were found in the verification directory.
    ///
    /// Raised during interactive selection when the discovery scan matches
    /// nothing. Fatal: there is nothing to run.
    #[error("no testbench files (tb_*.sv) found in {dir}")]
    NoTestbenches {
        /// The directory that was scanned.
        dir: PathBuf,
    },

    /// Interactive selection ended before a choice was made.
    ///
    /// Raised when the input stream reaches end-of-file while a prompt is
    /// still waiting for an answer.
    #[error("test selection aborted: input stream closed")]
    SelectionAborted,

    /// An external tool could not be launched at all.
    ///
    /// Distinct from [`FlowError::PhaseFailed`]: the process never started,
    /// typically because the tool is not installed or not on `PATH`.
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        /// The program that failed to start.
        program: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// An external flow step exited with a non-zero status.
    ///
    /// Fatal: the pipeline halts immediately with no partial continuation.
    #[error("step '{phase}' failed with exit status {status}")]
    PhaseFailed {
        /// Human-readable step name (e.g. `Compile`, `Simulate`).
        phase: String,
        /// The exit status reported by the tool (`-1` if terminated by signal).
        status: i32,
    },

    /// A configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// An underlying filesystem operation failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}
