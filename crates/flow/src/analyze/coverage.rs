//! Coverage report generation and scraping.
//!
//! Batch runs save a coverage database the simulator cannot display directly;
//! this module feeds it to the external coverage tool and scrapes the single
//! total-coverage percentage out of the resulting text report. A report whose
//! shape defeats the scrape is informational only, never fatal.

use std::fs;
use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use crate::common::{FlowError, tcl_path};
use crate::config::Config;
use crate::exec::CommandRunner;

/// Matches the total-coverage line of a textual coverage report and captures
/// the percentage figure.
static TOTAL_COVERAGE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // pattern is a literal, verified by tests
    let re = Regex::new(r"(?im)^total\b.*?coverage:?\s*([0-9]+(?:\.[0-9]+)?)%").unwrap();
    re
});

/// Generates the textual coverage report for `test` and scrapes its total.
///
/// Invokes `<coverage_tool> report -output <t>_cov.rpt <t>.ucdb`. A non-zero
/// tool status is a fatal phase failure; a missing percentage in an otherwise
/// valid report is not (`None` is returned and a note logged).
pub fn generate_report(
    config: &Config,
    runner: &mut dyn CommandRunner,
    test: &str,
) -> Result<Option<f64>, FlowError> {
    let ucdb = config.ucdb_file(test);
    let report = config.coverage_report_file(test);

    let args = vec![
        "report".to_string(),
        "-output".to_string(),
        tcl_path(&report),
        tcl_path(&ucdb),
    ];
    let output = runner.run(&config.tools.coverage_tool, &args)?;
    if !output.success() {
        return Err(FlowError::PhaseFailed {
            phase: "Coverage Report".to_string(),
            status: output.status,
        });
    }

    let text = fs::read_to_string(&report)?;
    let percentage = scrape_percentage(&text);
    if percentage.is_none() {
        info!(report = %report.display(), "no total-coverage percentage found in report");
    }
    Ok(percentage)
}

/// Extracts the total-coverage percentage from a report body, if present.
pub fn scrape_percentage(report: &str) -> Option<f64> {
    TOTAL_COVERAGE
        .captures(report)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
