//! Terminal color constants and ANSI escape stripping.
//!
//! Console output is decorated with raw SGR sequences; the persisted summary
//! report must carry none of them. The stripper also removes escapes that
//! arrive embedded in simulator log lines.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Magenta header color.
pub const HEADER: &str = "\x1b[95m";
/// Green, used for passing totals and the PASS verdict.
pub const OK_GREEN: &str = "\x1b[92m";
/// Yellow, used for detail section headings.
pub const WARNING: &str = "\x1b[93m";
/// Red, used for failing totals and the FAIL verdict.
pub const FAIL: &str = "\x1b[91m";
/// Reset to default rendition.
pub const ENDC: &str = "\x1b[0m";
/// Bold rendition.
pub const BOLD: &str = "\x1b[1m";

/// Matches two-byte escapes and full CSI sequences.
static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // pattern is a literal, verified by tests
    let re = Regex::new(r"\x1B(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])").unwrap();
    re
});

/// Removes all ANSI escape sequences from `text`.
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    ANSI_ESCAPE.replace_all(text, "")
}
