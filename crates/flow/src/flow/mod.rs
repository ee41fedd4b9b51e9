//! Run orchestration: select, clean, compile, elaborate, simulate, analyze.
//!
//! This module drives one complete simulation run. It provides:
//! 1. **`RunFlow`:** The pipeline over injected seams (runner, state store,
//!    selection prompt), so every branch is unit-testable without real tools.
//! 2. **Phase execution:** One external command per phase; the first non-zero
//!    exit status halts the pipeline with no retry and no partial continuation.
//! 3. **Modes:** GUI mode ends after launching the simulator with a waveform
//!    setup; batch mode continues into coverage reporting and log analysis.

/// Stale artifact cleanup.
pub mod clean;
/// Testbench discovery and interactive selection.
pub mod select;
/// Last-selected-test persistence.
pub mod state;

use std::env;
use std::path::PathBuf;

use tracing::debug;

use crate::analyze::{self, AnalyzeOutcome};
use crate::common::{FlowError, tcl_path};
use crate::config::Config;
use crate::exec::{CommandOutput, CommandRunner};
use self::clean::clean_previous_run;
use self::select::{SelectionPrompt, resolve_test};
use self::state::StateStore;

/// Per-invocation run parameters.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Launch the simulator GUI instead of a batch run.
    pub gui: bool,
    /// Random seed forwarded as `-sv_seed`; overrides the configured seed.
    pub seed: Option<u32>,
    /// Explicit testbench name; absent triggers interactive selection.
    pub test: Option<String>,
}

/// How the simulate phase is assembled.
///
/// Resolved by the orchestrator before argument construction so the argument
/// builder stays a pure function of its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulateMode {
    /// Interactive GUI session; `wave_script` is the wave-format script to
    /// load, or `None` to fall back to showing all signals.
    Gui {
        /// Wave-format script confirmed to exist, if any.
        wave_script: Option<PathBuf>,
    },
    /// Headless run writing the transcript and waveform database.
    Batch,
}

/// Result of a completed run.
#[derive(Debug)]
pub enum RunOutcome {
    /// GUI session finished; no post-run analysis is performed.
    Gui {
        /// The testbench that ran.
        test: String,
    },
    /// Batch run finished; coverage was reported and the log analyzed.
    Batch {
        /// The testbench that ran.
        test: String,
        /// Scraped total-coverage percentage, when the report yielded one.
        coverage: Option<f64>,
        /// Outcome of analyzing the simulation log.
        analysis: AnalyzeOutcome,
    },
}

/// One complete simulation run over injected collaborators.
pub struct RunFlow<'a> {
    config: &'a Config,
    runner: &'a mut dyn CommandRunner,
    store: &'a dyn StateStore,
    prompt: &'a mut dyn SelectionPrompt,
}

impl std::fmt::Debug for RunFlow<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunFlow").finish_non_exhaustive()
    }
}

impl<'a> RunFlow<'a> {
    /// Creates a flow over the given collaborators.
    pub fn new(
        config: &'a Config,
        runner: &'a mut dyn CommandRunner,
        store: &'a dyn StateStore,
        prompt: &'a mut dyn SelectionPrompt,
    ) -> Self {
        Self {
            config,
            runner,
            store,
            prompt,
        }
    }

    /// Executes the full pipeline for `opts`.
    ///
    /// Order: license notice, test resolution, selection persistence, stale
    /// artifact cleanup, compile, elaborate, simulate; then, batch mode only,
    /// coverage reporting and log analysis.
    pub fn execute(&mut self, opts: &RunOptions) -> Result<RunOutcome, FlowError> {
        license_notice(&self.config.tools.license_env);

        let test = resolve_test(
            opts.test.clone(),
            &self.config.verification_dir(),
            &self.config.project.tb_prefix,
            &self.config.project.tb_extension,
            self.store,
            self.prompt,
        )?;
        self.store.save(&test)?;
        println!("\n--- INFO: Selected Testbench: {test} ---");

        println!("\n--- INFO: Cleaning previous run ---");
        clean_previous_run(self.config, &test)?;

        let compile = tcl_path(&self.config.compile_script());
        let _ = self.phase(
            "Compile",
            &["-c".to_string(), "-do".to_string(), compile],
        )?;

        let elaborate = tcl_path(&self.config.elaborate_script());
        let _ = self.phase(
            "Elaborate",
            &["-c".to_string(), "-do".to_string(), elaborate],
        )?;

        let mode = if opts.gui {
            let wave = self.config.wave_format_script();
            if wave.exists() {
                println!("INFO: Loading custom wave format from {}", wave.display());
                SimulateMode::Gui {
                    wave_script: Some(wave),
                }
            } else {
                println!(
                    "WARNING: Wave format file not found at {}. Adding all waves generically.",
                    wave.display()
                );
                SimulateMode::Gui { wave_script: None }
            }
        } else {
            SimulateMode::Batch
        };

        let seed = opts.seed.unwrap_or(self.config.simulate.seed);
        let args = build_simulate_args(self.config, &test, seed, &mode);
        let _ = self.phase("Simulate", &args)?;

        if opts.gui {
            return Ok(RunOutcome::Gui { test });
        }

        println!("\n--- INFO: Starting Step: Coverage Report ---");
        let coverage = analyze::coverage::generate_report(self.config, self.runner, &test)?;

        let analysis = analyze::analyze_log(
            &self.config.log_file(&test),
            &self.config.report.summary_file,
            self.config.report.mismatch_display_cap,
        )?;

        Ok(RunOutcome::Batch {
            test,
            coverage,
            analysis,
        })
    }

    /// Runs one external phase through the simulator executable.
    ///
    /// A non-zero exit status is fatal; captured stderr is echoed first so
    /// the tool's own diagnostics are not lost.
    fn phase(&mut self, name: &str, args: &[String]) -> Result<CommandOutput, FlowError> {
        let program = &self.config.tools.simulator;
        println!("\n--- INFO: Starting Step: {name} ---");
        println!("Executing: {program} {}", args.join(" "));
        debug!(phase = name, program = %program, ?args, "invoking external phase");

        let output = self.runner.run(program, args)?;
        if !output.success() {
            if !output.stderr.is_empty() {
                eprintln!("{}", output.stderr.trim_end());
            }
            eprintln!("\n--- ERROR: Step '{name}' failed! ---");
            return Err(FlowError::PhaseFailed {
                phase: name.to_string(),
                status: output.status,
            });
        }
        Ok(output)
    }
}

/// Assembles the simulate-phase argument list.
///
/// Shared shape: `<top> -coverage -voptargs=+acc -sv_seed <seed> -L <lib>`.
/// GUI mode appends `-gui` and a Tcl `-do` string that sets up waves, runs,
/// and saves coverage; batch mode appends `-c`, the transcript/waveform file
/// arguments, and a `-do` string that additionally quits the simulator.
/// Paths embedded in Tcl strings always use forward slashes.
pub fn build_simulate_args(
    config: &Config,
    test: &str,
    seed: u32,
    mode: &SimulateMode,
) -> Vec<String> {
    let top = format!("{test}{}", config.simulate.opt_suffix);
    let ucdb = tcl_path(&config.ucdb_file(test));

    let mut args = vec![
        top,
        "-coverage".to_string(),
        "-voptargs=+acc".to_string(),
        "-sv_seed".to_string(),
        seed.to_string(),
        "-L".to_string(),
        config.simulate.design_lib.clone(),
    ];

    let run_and_save = format!("run -all; coverage save {ucdb};");

    match mode {
        SimulateMode::Gui { wave_script } => {
            let wave_command = wave_script.as_ref().map_or_else(
                || "add wave -r /*;".to_string(),
                |script| format!("do {};", tcl_path(script)),
            );
            args.push("-gui".to_string());
            args.push("-do".to_string());
            args.push(format!("{wave_command}{run_and_save}"));
        }
        SimulateMode::Batch => {
            args.push("-c".to_string());
            args.push("-logfile".to_string());
            args.push(tcl_path(&config.log_file(test)));
            args.push("-wlf".to_string());
            args.push(tcl_path(&config.wlf_file(test)));
            args.push("-do".to_string());
            args.push(format!("{run_and_save} quit -f"));
        }
    }

    args
}

/// Prints the license-server notice.
///
/// Informational only: the value is echoed when set and a warning printed
/// when unset. No behavior branches on it.
fn license_notice(env_var: &str) {
    match env::var(env_var) {
        Ok(value) if !value.is_empty() => println!("{env_var} = {value}"),
        _ => println!("\n--- WARNING: {env_var} is not set! ---"),
    }
}
