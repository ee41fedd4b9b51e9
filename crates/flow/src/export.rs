//! Plain-text source snapshot.
//!
//! Copies every design and verification source into a single flat directory,
//! renamed to `.txt`, so the sources can be attached to documentation or
//! review systems that reject HDL extensions. Copies are safe: destinations
//! are created or overwritten, sources are never touched.

use std::fs;
use std::path::Path;

use crate::common::FlowError;
use crate::config::Config;

/// Copies all design and verification sources into the export directory.
///
/// Each file lands as `<stem>.txt` regardless of its original extension.
/// Missing source directories are skipped with a notice; a per-file copy
/// failure is reported and does not abort the sweep. Returns the number of
/// files copied.
pub fn export_sources(config: &Config) -> Result<usize, FlowError> {
    let dest = config.export_dir();
    if !dest.exists() {
        fs::create_dir_all(&dest)?;
        println!("Created destination folder: {}", dest.display());
    }

    let mut copied = 0usize;
    for folder in [config.design_dir(), config.verification_dir()] {
        if !folder.exists() {
            println!("Skipping (not found): {}", folder.display());
            continue;
        }
        copy_tree_as_txt(&folder, &dest, &mut copied)?;
    }

    println!("{}", "-".repeat(30));
    println!("Done. {copied} files copied to '{}'.", dest.display());
    Ok(copied)
}

/// Recursively copies every file under `dir` into `dest` as `<stem>.txt`.
fn copy_tree_as_txt(dir: &Path, dest: &Path, copied: &mut usize) -> Result<(), FlowError> {
    for entry in dir.read_dir()? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            copy_tree_as_txt(&path, dest, copied)?;
            continue;
        }

        let Some(stem) = path.file_stem() else { continue };
        let mut target_name = stem.to_os_string();
        target_name.push(".txt");
        let target = dest.join(&target_name);

        match fs::copy(&path, &target) {
            Ok(_) => {
                println!(
                    "Copied: {}  >>>  {}",
                    entry.file_name().to_string_lossy(),
                    target_name.to_string_lossy()
                );
                *copied += 1;
            }
            Err(err) => {
                eprintln!(
                    "Error with file {}: {err}",
                    entry.file_name().to_string_lossy()
                );
            }
        }
    }
    Ok(())
}
