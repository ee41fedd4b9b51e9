//! Testbench discovery and interactive selection.
//!
//! This module resolves which testbench a run targets. It provides:
//! 1. **Discovery:** Scanning the verification directory for `tb_*.sv` sources.
//! 2. **`SelectionPrompt`:** The seam interactive questions go through, so
//!    tests can supply canned answers instead of real keyboard input.
//! 3. **`ConsolePrompt`:** The production prompt over any `BufRead`/`Write`
//!    pair, with re-prompting on invalid numeric input.

use std::io::{BufRead, Write};
use std::path::Path;

use crate::common::FlowError;
use crate::flow::state::StateStore;

/// Interactive questions the selection policy may need answered.
pub trait SelectionPrompt {
    /// Asks whether the previously recorded `previous` test should be reused.
    fn use_previous(&mut self, previous: &str) -> Result<bool, FlowError>;

    /// Presents `options` and returns the zero-based index of the choice.
    ///
    /// Implementations own their presentation and validation; the returned
    /// index is always in range.
    fn choose(&mut self, options: &[String]) -> Result<usize, FlowError>;
}

/// Production prompt reading answers line-by-line from `input`.
///
/// Invalid numeric input re-prompts rather than aborting; end-of-file while
/// a question is pending surfaces as [`FlowError::SelectionAborted`].
#[derive(Debug)]
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    /// Creates a prompt over the given streams.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Reads one trimmed answer line, or `None` at end-of-file.
    fn read_line(&mut self) -> Result<Option<String>, FlowError> {
        let mut line = String::new();
        let bytes = self.input.read_line(&mut line)?;
        if bytes == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> SelectionPrompt for ConsolePrompt<R, W> {
    fn use_previous(&mut self, previous: &str) -> Result<bool, FlowError> {
        writeln!(self.output, "\nPrevious test found: {previous}")?;
        write!(self.output, "Use previous test? (y/n): ")?;
        self.output.flush()?;
        match self.read_line()? {
            Some(answer) => Ok(answer.eq_ignore_ascii_case("y")),
            None => Err(FlowError::SelectionAborted),
        }
    }

    fn choose(&mut self, options: &[String]) -> Result<usize, FlowError> {
        writeln!(self.output, "\nAvailable Testbenches:")?;
        for (i, tb) in options.iter().enumerate() {
            writeln!(self.output, "  {}. {tb}", i + 1)?;
        }

        loop {
            write!(self.output, "\nSelect a testbench number: ")?;
            self.output.flush()?;
            let Some(answer) = self.read_line()? else {
                return Err(FlowError::SelectionAborted);
            };
            match answer.parse::<usize>() {
                Ok(choice) if (1..=options.len()).contains(&choice) => {
                    return Ok(choice - 1);
                }
                Ok(_) => {
                    writeln!(self.output, "Invalid choice, try again.")?;
                }
                Err(_) => {
                    writeln!(self.output, "Please enter a number.")?;
                }
            }
        }
    }
}

/// Scans `dir` for testbench sources and returns their names, sorted.
///
/// A testbench source is a file named `<prefix>*<extension>`; the returned
/// names have the extension stripped. Sorting keeps the enumerated menu
/// stable across runs and platforms.
pub fn discover_testbenches(
    dir: &Path,
    prefix: &str,
    extension: &str,
) -> Result<Vec<String>, FlowError> {
    let mut found = Vec::new();
    for entry in dir.read_dir()? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(prefix) && name.ends_with(extension) {
            found.push(name[..name.len() - extension.len()].to_string());
        }
    }

    if found.is_empty() {
        return Err(FlowError::NoTestbenches {
            dir: dir.to_path_buf(),
        });
    }
    found.sort();
    Ok(found)
}

/// Resolves the testbench a run targets.
///
/// An explicit name wins outright. Otherwise, a recorded previous selection is
/// offered back first; declined or absent, the discovered testbenches are
/// presented as an enumerated choice.
pub fn resolve_test(
    explicit: Option<String>,
    verification_dir: &Path,
    prefix: &str,
    extension: &str,
    store: &dyn StateStore,
    prompt: &mut dyn SelectionPrompt,
) -> Result<String, FlowError> {
    if let Some(test) = explicit {
        return Ok(test);
    }

    if let Some(previous) = store.load()? {
        if prompt.use_previous(&previous)? {
            return Ok(previous);
        }
    }

    let options = discover_testbenches(verification_dir, prefix, extension)?;
    let index = prompt.choose(&options)?;
    Ok(options[index].clone())
}
