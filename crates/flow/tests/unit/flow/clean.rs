//! Stale artifact cleanup tests.

use std::fs;

use crate::common::harness::TestContext;
use tbrun_core::flow::clean::clean_previous_run;

/// Populates the sim directory with a full artifact set for `test`.
fn seed_artifacts(ctx: &TestContext, test: &str) {
    for lib in &ctx.config.simulate.work_libs {
        let dir = ctx.sim_path(lib);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("_lib.qdb"), "binary").unwrap();
    }
    for name in [
        format!("{test}.log"),
        format!("{test}.wlf"),
        format!("{test}.ucdb"),
        format!("{test}_cov.rpt"),
    ] {
        fs::write(ctx.sim_path(&name), "stale").unwrap();
    }
}

#[test]
fn removes_library_dirs_and_per_test_files() {
    let ctx = TestContext::new();
    seed_artifacts(&ctx, "tb_fifo");

    clean_previous_run(&ctx.config, "tb_fifo").unwrap();

    assert!(!ctx.sim_path("work").exists());
    assert!(!ctx.sim_path("design_work").exists());
    assert!(!ctx.sim_path("tb_fifo.log").exists());
    assert!(!ctx.sim_path("tb_fifo.wlf").exists());
    assert!(!ctx.sim_path("tb_fifo.ucdb").exists());
    assert!(!ctx.sim_path("tb_fifo_cov.rpt").exists());
}

#[test]
fn leaves_other_tests_artifacts_alone() {
    let ctx = TestContext::new();
    seed_artifacts(&ctx, "tb_fifo");
    fs::write(ctx.sim_path("tb_uart.log"), "keep").unwrap();

    clean_previous_run(&ctx.config, "tb_fifo").unwrap();

    assert!(ctx.sim_path("tb_uart.log").exists());
}

#[test]
fn succeeds_when_nothing_exists() {
    let ctx = TestContext::new();
    clean_previous_run(&ctx.config, "tb_fifo").unwrap();
}

#[test]
fn is_idempotent() {
    let ctx = TestContext::new();
    seed_artifacts(&ctx, "tb_fifo");

    clean_previous_run(&ctx.config, "tb_fifo").unwrap();
    clean_previous_run(&ctx.config, "tb_fifo").unwrap();
}
