//! Common types and helpers shared across the harness.

/// Error type for the run flow and analyzer.
pub mod error;

pub use error::FlowError;

use std::path::Path;

/// Renders a path for embedding inside a Tcl `-do` command string.
///
/// Simulator Tcl interpreters expect forward slashes regardless of the host
/// separator; a bare Windows path inside a `-do` string would have its
/// backslashes eaten as escapes (`\t`, `\n`, ...).
pub fn tcl_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
