//! Orchestrator pipeline tests.
//!
//! Drives `RunFlow` end-to-end over scripted seams: no real simulator, no
//! keyboard, no state file. Phase ordering, halt-on-failure, and the GUI/batch
//! split are all asserted here.

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;

use crate::common::harness::TestContext;
use crate::common::mocks::prompt::ScriptedPrompt;
use crate::common::mocks::runner::ScriptedRunner;
use crate::common::mocks::state::MemoryStateStore;
use tbrun_core::analyze::AnalyzeOutcome;
use tbrun_core::common::tcl_path;
use tbrun_core::flow::{SimulateMode, build_simulate_args};
use tbrun_core::{Config, FlowError, RunFlow, RunOptions, RunOutcome};

/// Runs the flow for `tb_fifo` with the given runner and options.
fn run_flow(
    ctx: &TestContext,
    runner: &mut ScriptedRunner,
    opts: &RunOptions,
) -> (Result<RunOutcome, FlowError>, MemoryStateStore) {
    let store = MemoryStateStore::empty();
    let mut prompt = ScriptedPrompt::default();
    let result = RunFlow::new(&ctx.config, runner, &store, &mut prompt).execute(opts);
    (result, store)
}

/// Options for an explicit batch run of `tb_fifo` with seed 7.
fn batch_opts() -> RunOptions {
    RunOptions {
        gui: false,
        seed: Some(7),
        test: Some("tb_fifo".to_string()),
    }
}

// ══════════════════════════════════════════════════════════
// 1. Batch pipeline
// ══════════════════════════════════════════════════════════

#[test]
fn batch_runs_phases_then_coverage_then_analysis() {
    let ctx = TestContext::new();
    let mut runner = ScriptedRunner::ok()
        .touch_on(
            "vsim",
            ctx.config.log_file("tb_fifo"),
            "[10] MATCH!\n[11] MATCH!\n",
        )
        .touch_on(
            "vcover",
            ctx.config.coverage_report_file("tb_fifo"),
            "TOTAL COVERGROUP COVERAGE: 87.50%\n",
        );

    let (result, store) = run_flow(&ctx, &mut runner, &batch_opts());

    assert_eq!(runner.programs(), vec!["vsim", "vsim", "vsim", "vcover"]);
    assert_eq!(*store.saves.borrow(), vec!["tb_fifo".to_string()]);

    match result.unwrap() {
        RunOutcome::Batch {
            test,
            coverage,
            analysis,
        } => {
            assert_eq!(test, "tb_fifo");
            assert_eq!(coverage, Some(87.50));
            match analysis {
                AnalyzeOutcome::Report(report) => {
                    assert_eq!(report.analysis.matches, 2);
                    assert!(report.analysis.passed());
                    assert!(report.report_path.exists());
                }
                AnalyzeOutcome::MissingLog(path) => panic!("log should exist at {path:?}"),
            }
        }
        RunOutcome::Gui { .. } => panic!("expected a batch outcome"),
    }
}

#[test]
fn compile_and_elaborate_run_their_do_scripts() {
    let ctx = TestContext::new();
    let mut runner = ScriptedRunner::ok()
        .touch_on("vsim", ctx.config.log_file("tb_fifo"), "")
        .touch_on("vcover", ctx.config.coverage_report_file("tb_fifo"), "");

    let (result, _) = run_flow(&ctx, &mut runner, &batch_opts());
    assert!(result.is_ok());

    let compile = tcl_path(&ctx.config.compile_script());
    let elaborate = tcl_path(&ctx.config.elaborate_script());
    assert_eq!(
        runner.calls[0].1,
        vec!["-c".to_string(), "-do".to_string(), compile]
    );
    assert_eq!(
        runner.calls[1].1,
        vec!["-c".to_string(), "-do".to_string(), elaborate]
    );
}

#[test]
fn simulate_forwards_the_requested_seed() {
    let ctx = TestContext::new();
    let mut runner = ScriptedRunner::ok()
        .touch_on("vsim", ctx.config.log_file("tb_fifo"), "")
        .touch_on("vcover", ctx.config.coverage_report_file("tb_fifo"), "");

    let (result, _) = run_flow(&ctx, &mut runner, &batch_opts());
    assert!(result.is_ok());

    let simulate_args = &runner.calls[2].1;
    let seed_pos = simulate_args
        .iter()
        .position(|a| a == "-sv_seed")
        .unwrap();
    assert_eq!(simulate_args[seed_pos + 1], "7");
}

#[test]
fn unscrapable_coverage_report_is_not_fatal() {
    let ctx = TestContext::new();
    let mut runner = ScriptedRunner::ok()
        .touch_on("vsim", ctx.config.log_file("tb_fifo"), "[1] MATCH!\n")
        .touch_on(
            "vcover",
            ctx.config.coverage_report_file("tb_fifo"),
            "no totals here\n",
        );

    let (result, _) = run_flow(&ctx, &mut runner, &batch_opts());

    match result.unwrap() {
        RunOutcome::Batch { coverage, .. } => assert_eq!(coverage, None),
        RunOutcome::Gui { .. } => panic!("expected a batch outcome"),
    }
}

// ══════════════════════════════════════════════════════════
// 2. Halt on phase failure
// ══════════════════════════════════════════════════════════

#[test]
fn compile_failure_stops_everything() {
    let ctx = TestContext::new();
    let mut runner = ScriptedRunner::with_statuses(&[1]);

    let (result, _) = run_flow(&ctx, &mut runner, &batch_opts());

    match result {
        Err(FlowError::PhaseFailed { phase, status }) => {
            assert_eq!(phase, "Compile");
            assert_eq!(status, 1);
        }
        other => panic!("expected PhaseFailed, got {other:?}"),
    }
    assert_eq!(runner.calls.len(), 1);
}

#[test]
fn elaborate_failure_stops_before_simulate() {
    let ctx = TestContext::new();
    let mut runner = ScriptedRunner::with_statuses(&[0, 2]);

    let (result, store) = run_flow(&ctx, &mut runner, &batch_opts());

    match result {
        Err(FlowError::PhaseFailed { phase, status }) => {
            assert_eq!(phase, "Elaborate");
            assert_eq!(status, 2);
        }
        other => panic!("expected PhaseFailed, got {other:?}"),
    }
    assert_eq!(runner.calls.len(), 2);
    // The selection was persisted before the phases began.
    assert_eq!(store.current(), Some("tb_fifo".to_string()));
}

#[test]
fn simulate_failure_skips_coverage_and_analysis() {
    let ctx = TestContext::new();
    let mut runner = ScriptedRunner::with_statuses(&[0, 0, 3]);

    let (result, _) = run_flow(&ctx, &mut runner, &batch_opts());

    match result {
        Err(FlowError::PhaseFailed { phase, status }) => {
            assert_eq!(phase, "Simulate");
            assert_eq!(status, 3);
        }
        other => panic!("expected PhaseFailed, got {other:?}"),
    }
    assert_eq!(runner.calls.len(), 3);
    assert!(!ctx.sim_path("summary_report.txt").exists());
}

// ══════════════════════════════════════════════════════════
// 3. GUI vs batch
// ══════════════════════════════════════════════════════════

#[test]
fn gui_mode_runs_no_post_simulation_steps() {
    let ctx = TestContext::new();
    let mut runner = ScriptedRunner::ok();
    let opts = RunOptions {
        gui: true,
        seed: None,
        test: Some("tb_fifo".to_string()),
    };

    let (result, _) = run_flow(&ctx, &mut runner, &opts);

    match result.unwrap() {
        RunOutcome::Gui { test } => assert_eq!(test, "tb_fifo"),
        RunOutcome::Batch { .. } => panic!("expected a GUI outcome"),
    }
    assert_eq!(runner.programs(), vec!["vsim", "vsim", "vsim"]);
    assert!(!ctx.sim_path("summary_report.txt").exists());
}

#[test]
fn gui_mode_without_wave_format_shows_all_signals() {
    let ctx = TestContext::new();
    let mut runner = ScriptedRunner::ok();
    let opts = RunOptions {
        gui: true,
        seed: None,
        test: Some("tb_fifo".to_string()),
    };

    let (result, _) = run_flow(&ctx, &mut runner, &opts);
    assert!(result.is_ok());

    let simulate_args = &runner.calls[2].1;
    assert!(simulate_args.contains(&"-gui".to_string()));
    let do_arg = simulate_args.last().unwrap();
    assert!(do_arg.starts_with("add wave -r /*;"));
}

#[test]
fn gui_mode_loads_wave_format_when_present() {
    let ctx = TestContext::new();
    fs::write(ctx.config.wave_format_script(), "add wave /tb_fifo/clk\n").unwrap();
    let mut runner = ScriptedRunner::ok();
    let opts = RunOptions {
        gui: true,
        seed: None,
        test: Some("tb_fifo".to_string()),
    };

    let (result, _) = run_flow(&ctx, &mut runner, &opts);
    assert!(result.is_ok());

    let do_arg = runner.calls[2].1.last().unwrap().clone();
    let wave = tcl_path(&ctx.config.wave_format_script());
    assert!(do_arg.starts_with(&format!("do {wave};")));
    assert!(!do_arg.contains("add wave -r"));
}

// ══════════════════════════════════════════════════════════
// 4. Simulate argument construction
// ══════════════════════════════════════════════════════════

/// Config rooted at a fixed path so argument strings are predictable.
fn proj_config() -> Config {
    let mut config = Config::default();
    config.project.root = PathBuf::from("/proj");
    config
}

#[test]
fn batch_args_have_the_full_shape() {
    let config = proj_config();
    let args = build_simulate_args(&config, "tb_fifo", 5, &SimulateMode::Batch);

    assert_eq!(
        args,
        vec![
            "tb_fifo_opt".to_string(),
            "-coverage".to_string(),
            "-voptargs=+acc".to_string(),
            "-sv_seed".to_string(),
            "5".to_string(),
            "-L".to_string(),
            "design_work".to_string(),
            "-c".to_string(),
            "-logfile".to_string(),
            "/proj/sim/tb_fifo.log".to_string(),
            "-wlf".to_string(),
            "/proj/sim/tb_fifo.wlf".to_string(),
            "-do".to_string(),
            "run -all; coverage save /proj/sim/tb_fifo.ucdb; quit -f".to_string(),
        ]
    );
}

#[test]
fn gui_args_append_wave_setup_and_no_quit() {
    let config = proj_config();
    let mode = SimulateMode::Gui {
        wave_script: Some(PathBuf::from("/proj/scripts/wave_format.do")),
    };
    let args = build_simulate_args(&config, "tb_fifo", 1, &mode);

    assert!(args.contains(&"-gui".to_string()));
    assert_eq!(
        args.last().unwrap(),
        "do /proj/scripts/wave_format.do;run -all; coverage save /proj/sim/tb_fifo.ucdb;"
    );
    assert!(!args.iter().any(|a| a.contains("quit -f")));
    assert!(!args.contains(&"-logfile".to_string()));
}

#[test]
fn gui_args_fall_back_to_all_signals() {
    let config = proj_config();
    let args = build_simulate_args(
        &config,
        "tb_fifo",
        1,
        &SimulateMode::Gui { wave_script: None },
    );

    assert_eq!(
        args.last().unwrap(),
        "add wave -r /*;run -all; coverage save /proj/sim/tb_fifo.ucdb;"
    );
}
