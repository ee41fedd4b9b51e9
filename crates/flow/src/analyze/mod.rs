//! Simulation log analysis and summary reporting.
//!
//! This module turns a raw simulator transcript into a pass/fail verdict. It
//! provides:
//! 1. **Classification:** Per-line scan into match/mismatch/error categories,
//!    with an assertion-failure sub-count.
//! 2. **Aggregation:** Totals, capped mismatch excerpts, and de-duplicated
//!    error messages with occurrence counts.
//! 3. **Rendering:** The fixed-format colored summary block, and its
//!    escape-free mirror persisted next to the scanned log.
//!
//! Classification is independent per line; there is no cross-line state
//! beyond the final aggregation, so truncated logs are scanned as-is.

/// Terminal colors and ANSI escape stripping.
pub mod ansi;
/// Coverage report generation and percentage scraping.
pub mod coverage;

use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::common::FlowError;
use self::ansi::{BOLD, ENDC, FAIL, HEADER, OK_GREEN, WARNING, strip_ansi};

/// Token marking a successful transaction comparison.
const MATCH_TOKEN: &str = "MATCH!";
/// Token marking a failed transaction comparison.
///
/// Checked before [`MATCH_TOKEN`]: the mismatch token contains the match
/// token as a substring.
const MISMATCH_TOKEN: &str = "MISMATCH!";
/// Substrings marking a simulator error line.
const ERROR_TOKENS: [&str; 2] = ["** Error", "Error:"];
/// Substrings marking a protocol-assertion failure within an error line.
const ASSERTION_TOKENS: [&str; 2] = ["SVA", "Assertion"];

/// Strips the `[Line N] ` prefix the scanner attaches to recorded excerpts.
static LINE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // pattern is a literal, verified by tests
    let re = Regex::new(r"^\[Line \d+\] ").unwrap();
    re
});

/// Aggregated classification of one simulation log.
#[derive(Debug, Clone, Default)]
pub struct LogAnalysis {
    /// Lines reporting a successful transaction comparison.
    pub matches: u64,
    /// Lines reporting a scoreboard mismatch.
    pub mismatches: u64,
    /// Lines reporting a simulator error.
    pub errors: u64,
    /// Subset of error lines that are protocol-assertion failures.
    ///
    /// A sub-count of `errors`, not an exclusive category: an assertion
    /// failure increments both.
    pub assertion_fails: u64,
    /// Verbatim mismatch lines, each prefixed `[Line N] `.
    pub mismatch_details: Vec<String>,
    /// Verbatim error lines, each prefixed `[Line N] `.
    pub error_details: Vec<String>,
}

impl LogAnalysis {
    /// Classifies one trimmed log line.
    ///
    /// First-match order: mismatch, match, error. `line_number` is 1-based.
    pub fn record_line(&mut self, line_number: usize, line: &str) {
        if line.contains(MISMATCH_TOKEN) {
            self.mismatches += 1;
            self.mismatch_details.push(format!("[Line {line_number}] {line}"));
        } else if line.contains(MATCH_TOKEN) {
            self.matches += 1;
        } else if ERROR_TOKENS.iter().any(|t| line.contains(t)) {
            self.errors += 1;
            self.error_details.push(format!("[Line {line_number}] {line}"));
            if ASSERTION_TOKENS.iter().any(|t| line.contains(t)) {
                self.assertion_fails += 1;
            }
        }
    }

    /// Whether the run passed: no mismatches and no errors.
    pub const fn passed(&self) -> bool {
        self.mismatches == 0 && self.errors == 0
    }

    /// Distinct error messages with occurrence counts, in first-seen order.
    ///
    /// Two error lines differing only in their line-number prefix collapse
    /// into one entry counted twice.
    pub fn unique_errors(&self) -> Vec<(String, usize)> {
        let mut unique: Vec<(String, usize)> = Vec::new();
        for detail in &self.error_details {
            let message = LINE_PREFIX.replace(detail, "").into_owned();
            match unique.iter_mut().find(|(m, _)| *m == message) {
                Some((_, count)) => *count += 1,
                None => unique.push((message, 1)),
            }
        }
        unique
    }
}

/// Scans a log stream line-by-line into a [`LogAnalysis`].
///
/// Lines are decoded lossily so invalid UTF-8 in the transcript never aborts
/// the scan. Line numbers are 1-based.
pub fn scan_log<R: BufRead>(mut reader: R) -> io::Result<LogAnalysis> {
    let mut analysis = LogAnalysis::default();
    let mut buf = Vec::new();
    let mut line_number = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_number += 1;
        let line = String::from_utf8_lossy(&buf);
        analysis.record_line(line_number, line.trim());
    }

    Ok(analysis)
}

/// The rendered summary, in its two forms.
///
/// `console` lines carry ANSI color; `report` lines are the same content with
/// every escape sequence stripped — including escapes that arrived embedded
/// in the log lines themselves.
#[derive(Debug, Clone, Default)]
pub struct RenderedReport {
    /// Colored lines for terminal display.
    pub console: Vec<String>,
    /// Escape-free lines for the persisted report file.
    pub report: Vec<String>,
}

impl RenderedReport {
    /// Appends one message in both forms.
    fn push(&mut self, message: &str, color: &str) {
        self.console.push(format!("{color}{message}{ENDC}"));
        self.report.push(strip_ansi(message).into_owned());
    }

    /// The persisted report body: all clean lines joined with newlines.
    pub fn report_body(&self) -> String {
        self.report.join("\n")
    }
}

/// Renders the fixed-format summary block for `analysis`.
///
/// `log_name` is the scanned file's display name; `mismatch_cap` bounds the
/// failure-detail mismatch listing.
pub fn render_summary(
    analysis: &LogAnalysis,
    log_name: &str,
    mismatch_cap: usize,
) -> RenderedReport {
    let mut out = RenderedReport::default();
    let rule = "-".repeat(60);

    out.push(&format!("\n--- Parsing Log File: {log_name} ---"), HEADER);
    out.push(&rule, "");
    out.push("SIMULATION SUMMARY", BOLD);
    out.push(&rule, "");

    out.push(
        &format!("Total Transactions (PASS):   {}", analysis.matches),
        OK_GREEN,
    );

    if analysis.mismatches > 0 {
        out.push(
            &format!("Scoreboard Mismatches:       {}", analysis.mismatches),
            FAIL,
        );
    } else {
        out.push("Scoreboard Mismatches:       0", OK_GREEN);
    }

    if analysis.errors > 0 {
        out.push(&format!("Total Errors:                {}", analysis.errors), FAIL);
        out.push(
            &format!("   -> Protocol/SVA Fails:    {}", analysis.assertion_fails),
            FAIL,
        );
    } else {
        out.push("Total Errors:                0", OK_GREEN);
    }

    out.push(&rule, "");

    if analysis.passed() {
        out.push("\nStatus: PASSED [V]", OK_GREEN);
        return out;
    }

    out.push("\n=== FAILURE DETAILS ===", FAIL);

    if !analysis.mismatch_details.is_empty() {
        out.push("\n--- Scoreboard Mismatches ---", WARNING);
        for detail in analysis.mismatch_details.iter().take(mismatch_cap) {
            out.push(&format!("  {detail}"), "");
        }
    }

    if !analysis.error_details.is_empty() {
        out.push("\n--- System/Protocol Errors (Unique) ---", WARNING);
        for (message, count) in analysis.unique_errors() {
            out.push(&format!("  [x{count}] {message}"), "");
        }
    }

    out.push("\nStatus: FAILED [X]", FAIL);
    out
}

/// Result of analyzing a log path.
#[derive(Debug)]
pub enum AnalyzeOutcome {
    /// The log file does not exist; nothing was scanned or written.
    ///
    /// Not an error: the caller prints a notice and exits cleanly.
    MissingLog(PathBuf),
    /// The log was scanned and the summary report written.
    Report(AnalyzeReport),
}

/// A completed analysis: the counts, the rendered block, and where the
/// escape-free mirror was written.
#[derive(Debug)]
pub struct AnalyzeReport {
    /// Aggregated classification counts and excerpts.
    pub analysis: LogAnalysis,
    /// Rendered summary in colored and clean forms.
    pub rendered: RenderedReport,
    /// Path of the persisted report file.
    pub report_path: PathBuf,
}

/// Analyzes the log at `path` and persists the summary report next to it.
///
/// A nonexistent path yields [`AnalyzeOutcome::MissingLog`] with no file
/// writes. Otherwise the log is scanned, the summary rendered, and its
/// escape-free form written to `<log dir>/<report_name>`.
pub fn analyze_log(
    path: &Path,
    report_name: &str,
    mismatch_cap: usize,
) -> Result<AnalyzeOutcome, FlowError> {
    if !path.exists() {
        return Ok(AnalyzeOutcome::MissingLog(path.to_path_buf()));
    }

    let file = fs::File::open(path)?;
    let analysis = scan_log(io::BufReader::new(file))?;

    let log_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let rendered = render_summary(&analysis, &log_name, mismatch_cap);

    let report_path = path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(report_name);
    fs::write(&report_path, rendered.report_body())?;

    Ok(AnalyzeOutcome::Report(AnalyzeReport {
        analysis,
        rendered,
        report_path,
    }))
}
