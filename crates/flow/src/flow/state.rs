//! Last-selected-test persistence.
//!
//! The harness remembers which testbench ran last so the next interactive
//! invocation can offer it back. The store is a trait so the flow can be
//! exercised in tests without touching the real filesystem.

use std::fs;
use std::path::PathBuf;

use crate::common::FlowError;

/// Load/save access to the single-string "current test" record.
///
/// There is exactly one record; saving overwrites it. No concurrent writers
/// are assumed.
pub trait StateStore {
    /// Returns the previously selected testbench name, if one was recorded.
    fn load(&self) -> Result<Option<String>, FlowError>;

    /// Records `test` as the current selection, replacing any prior record.
    fn save(&self, test: &str) -> Result<(), FlowError>;
}

/// Store backed by a plain-text file (conventionally `sim/.current_test`).
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Creates a store persisting to `path`.
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The file this store persists to.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Result<Option<String>, FlowError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        let name = raw.trim();
        if name.is_empty() {
            Ok(None)
        } else {
            Ok(Some(name.to_string()))
        }
    }

    fn save(&self, test: &str) -> Result<(), FlowError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, test.trim())?;
        Ok(())
    }
}
