//! Simulation run/report harness library.
//!
//! This crate implements the automation around an external HDL simulator:
//! 1. **Flow:** Test selection, stale artifact cleanup, and the
//!    compile/elaborate/simulate phase pipeline (GUI or batch).
//! 2. **Analysis:** Log classification into match/mismatch/error categories,
//!    a pass/fail verdict, and a persisted escape-free summary report.
//! 3. **Coverage:** Report generation from the coverage database and a
//!    total-percentage scrape.
//! 4. **Seams:** Command execution, state persistence, and interactive
//!    selection are traits, so the pipeline is testable without real tools,
//!    files, or keyboards.
//!
//! Execution is single-threaded and strictly sequential; the only blocking
//! operations are external process completion and interactive input.

/// Log analysis, summary rendering, and coverage scraping.
pub mod analyze;
/// Common types and helpers (errors, Tcl path rendering).
pub mod common;
/// Harness configuration (defaults, hierarchical config structures).
pub mod config;
/// External command invocation seam.
pub mod exec;
/// Export of design/verification sources as plain text.
pub mod export;
/// Run orchestration (selection, cleanup, phases, modes).
pub mod flow;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Crate-wide error type.
pub use crate::common::FlowError;
/// The run pipeline; construct with `RunFlow::new` over injected seams.
pub use crate::flow::{RunFlow, RunOptions, RunOutcome};
