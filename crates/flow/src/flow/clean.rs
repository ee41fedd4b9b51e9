//! Stale artifact cleanup.
//!
//! Deletes what a fresh run regenerates: the compiled library directories and
//! the per-test artifact files. Cleanup is not transactional; an interrupt
//! mid-sweep leaves a partially deleted set, which the next run finishes.

use std::fs;
use std::path::PathBuf;

use crate::common::FlowError;
use crate::config::Config;

/// Deletes the library directories and per-test artifacts for `test`.
///
/// Missing entries are skipped silently; only entries that exist are deleted
/// (and announced). Order: directories first, then files.
pub fn clean_previous_run(config: &Config, test: &str) -> Result<(), FlowError> {
    let sim_dir = config.sim_dir();

    let dirs: Vec<PathBuf> = config
        .simulate
        .work_libs
        .iter()
        .map(|lib| sim_dir.join(lib))
        .collect();

    let files = [
        config.log_file(test),
        config.wlf_file(test),
        config.ucdb_file(test),
        config.coverage_report_file(test),
    ];

    for dir in dirs {
        if dir.exists() {
            println!("Deleting directory: {}", dir.display());
            fs::remove_dir_all(&dir)?;
        }
    }

    for file in files {
        if file.exists() {
            println!("Deleting file: {}", file.display());
            fs::remove_file(&file)?;
        }
    }

    Ok(())
}
