//! Simulation run/report harness CLI.
//!
//! This binary provides a single entry point for the verification flow. It performs:
//! 1. **Run:** Select a testbench, clean stale artifacts, and drive the
//!    compile/elaborate/simulate phases (GUI or batch; batch continues into
//!    coverage reporting and log analysis).
//! 2. **Analyze:** Re-scan an existing simulation log and rewrite the summary report.
//! 3. **Export:** Snapshot design/verification sources as plain `.txt` files.

use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use tbrun_core::analyze::{self, AnalyzeOutcome, AnalyzeReport};
use tbrun_core::exec::SystemRunner;
use tbrun_core::export::export_sources;
use tbrun_core::flow::select::ConsolePrompt;
use tbrun_core::flow::state::FileStateStore;
use tbrun_core::{Config, FlowError, RunFlow, RunOptions, RunOutcome};

#[derive(Parser, Debug)]
#[command(
    name = "tbrun",
    author,
    version,
    about = "Run and report SystemVerilog simulations",
    long_about = "Select a testbench, run the compile/elaborate/simulate flow, and turn the \
resulting log and coverage files into a pass/fail summary.\n\nThe project layout and tool names \
are conventional (design/, verification/, sim/, scripts/, vsim, vcover); pass --config to \
override them with a JSON file.\n\nExamples:\n  tbrun run --test tb_axi_bridge --seed 7\n  \
tbrun run --gui\n  tbrun analyze sim/tb_axi_bridge.log\n  tbrun export-txt"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Select a testbench and run the full simulation flow.
    Run {
        /// Run the simulation in GUI mode (no post-run analysis).
        #[arg(long)]
        gui: bool,

        /// Random seed (defaults to the configured seed, 1).
        #[arg(long)]
        seed: Option<u32>,

        /// Testbench name (tb_xxx); omit to choose interactively.
        #[arg(short, long)]
        test: Option<String>,

        /// Harness configuration file (JSON).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Analyze a simulation log and write the summary report next to it.
    Analyze {
        /// Path to the simulation log.
        log: PathBuf,

        /// Harness configuration file (JSON).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Snapshot design and verification sources as .txt files.
    ExportTxt {
        /// Harness configuration file (JSON).
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            gui,
            seed,
            test,
            config,
        } => cmd_run(gui, seed, test, config),
        Commands::Analyze { log, config } => cmd_analyze(&log, config),
        Commands::ExportTxt { config } => cmd_export(config),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("--- ERROR: {e} ---");
            process::exit(1);
        }
    }
}

/// Loads the configuration file when given, the conventional defaults otherwise.
fn load_config(path: Option<PathBuf>) -> Result<Config, FlowError> {
    path.map_or_else(|| Ok(Config::default()), |p| Config::load(&p))
}

/// Runs the flow: selection, cleanup, phases, and (batch only) analysis.
///
/// Exit code 0 on success (GUI session, or batch run with a PASS verdict),
/// 1 when the analyzer reports FAIL. Phase failures propagate as errors.
fn cmd_run(
    gui: bool,
    seed: Option<u32>,
    test: Option<String>,
    config: Option<PathBuf>,
) -> Result<i32, FlowError> {
    let config = load_config(config)?;
    let mut runner = SystemRunner;
    let store = FileStateStore::new(config.state_file());
    let mut prompt = ConsolePrompt::new(io::stdin().lock(), io::stdout());

    let opts = RunOptions { gui, seed, test };
    let outcome = RunFlow::new(&config, &mut runner, &store, &mut prompt).execute(&opts)?;

    match outcome {
        RunOutcome::Gui { test } => {
            println!("\n--- INFO: GUI session for {test} finished. ---");
            Ok(0)
        }
        RunOutcome::Batch {
            test,
            coverage,
            analysis,
        } => {
            if let Some(percent) = coverage {
                println!("\nTotal coverage: {percent:.2}%");
            }
            let code = report_analysis(analysis);
            println!(
                "\n--- INFO: All steps completed. Check {} for results. ---",
                config.log_file(&test).display()
            );
            Ok(code)
        }
    }
}

/// Analyzes an existing log. Exit code 0 on PASS (or missing log), 1 on FAIL.
fn cmd_analyze(log: &Path, config: Option<PathBuf>) -> Result<i32, FlowError> {
    let config = load_config(config)?;
    let outcome = analyze::analyze_log(
        log,
        &config.report.summary_file,
        config.report.mismatch_display_cap,
    )?;
    Ok(report_analysis(outcome))
}

/// Snapshots the design/verification sources. Exit code 0.
fn cmd_export(config: Option<PathBuf>) -> Result<i32, FlowError> {
    let config = load_config(config)?;
    let _ = export_sources(&config)?;
    Ok(0)
}

/// Prints an analysis outcome and returns the matching exit code.
///
/// A missing log is a printed notice, not a failure. A scanned log maps the
/// verdict to the exit code so calling automation can branch on it.
fn report_analysis(outcome: AnalyzeOutcome) -> i32 {
    match outcome {
        AnalyzeOutcome::MissingLog(path) => {
            println!("Error: Log file not found at {}", path.display());
            0
        }
        AnalyzeOutcome::Report(AnalyzeReport {
            analysis,
            rendered,
            report_path,
        }) => {
            for line in &rendered.console {
                println!("{line}");
            }
            println!("\nFull report saved to: {}", report_path.display());
            i32::from(!analysis.passed())
        }
    }
}
