//! Configuration system for the simulation harness.
//!
//! This module defines all configuration structures used to parameterize the
//! run flow. It provides:
//! 1. **Defaults:** Baseline project layout and tool names (QuestaSim-style).
//! 2. **Structures:** Hierarchical config for project paths, tools, the
//!    simulate step, and reporting.
//! 3. **Derived paths:** Helpers resolving per-test artifact locations.
//!
//! Configuration is supplied via a JSON file (`--config`) or use
//! `Config::default()` for a conventionally laid out project.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::common::FlowError;

/// Default configuration constants for the harness.
///
/// These values describe the conventional project layout the harness expects
/// when no configuration file overrides them.
mod defaults {
    /// Simulator executable invoked for compile, elaborate, and simulate.
    pub const SIMULATOR: &str = "vsim";

    /// Coverage tool executable invoked to render the coverage database.
    pub const COVERAGE_TOOL: &str = "vcover";

    /// Environment variable naming the license server.
    ///
    /// Read-only and informational: its value is printed when set and a
    /// warning is printed when unset. No behavior depends on it.
    pub const LICENSE_ENV: &str = "SALT_LICENSE_SERVER";

    /// Directory holding the design sources, relative to the project root.
    pub const DESIGN_DIR: &str = "design";

    /// Directory holding the testbench sources, relative to the project root.
    pub const VERIFICATION_DIR: &str = "verification";

    /// Directory where all run artifacts are produced.
    pub const SIM_DIR: &str = "sim";

    /// Directory holding the simulator Tcl scripts.
    pub const SCRIPTS_DIR: &str = "scripts";

    /// Destination for the plain-text source snapshot.
    pub const EXPORT_DIR: &str = "docs/sv_as_txt";

    /// Filename prefix identifying a testbench source.
    pub const TB_PREFIX: &str = "tb_";

    /// Filename extension identifying a testbench source.
    pub const TB_EXTENSION: &str = ".sv";

    /// Default random seed forwarded to the simulator.
    pub const SEED: u32 = 1;

    /// Suffix appended to the testbench name to form the optimized top unit.
    pub const OPT_SUFFIX: &str = "_opt";

    /// Library the simulate step links against (`-L`).
    pub const DESIGN_LIB: &str = "design_work";

    /// Compile-step Tcl script, relative to the scripts directory.
    pub const COMPILE_SCRIPT: &str = "compile.do";

    /// Elaborate-step Tcl script, relative to the scripts directory.
    pub const ELABORATE_SCRIPT: &str = "elaborate.do";

    /// Optional wave-format Tcl script loaded in GUI mode when present.
    pub const WAVE_FORMAT_SCRIPT: &str = "wave_format.do";

    /// File remembering the last-selected testbench, inside the sim directory.
    pub const STATE_FILE: &str = ".current_test";

    /// Analyzer summary report filename, written next to the scanned log.
    pub const SUMMARY_FILE: &str = "summary_report.txt";

    /// Maximum number of mismatch excerpts listed in the failure details.
    pub const MISMATCH_DISPLAY_CAP: usize = 20;
}

/// Root configuration structure containing all harness settings.
///
/// Deserialize from JSON for a non-standard project layout, or use
/// `Config::default()` for the conventional one.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use tbrun_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.tools.simulator, "vsim");
/// assert_eq!(config.simulate.seed, 1);
/// ```
///
/// Deserializing a partial override (unspecified fields keep their defaults):
///
/// ```
/// use tbrun_core::config::Config;
///
/// let json = r#"{
///     "project": { "root": "/work/fpga", "sim_dir": "out" },
///     "tools": { "simulator": "/opt/questa/bin/vsim" },
///     "simulate": { "seed": 7 }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.simulate.seed, 7);
/// assert_eq!(config.tools.coverage_tool, "vcover");
/// assert!(config.sim_dir().ends_with("out"));
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Project directory layout
    #[serde(default)]
    pub project: ProjectConfig,
    /// External tool names and license settings
    #[serde(default)]
    pub tools: ToolConfig,
    /// Simulate-step parameters
    #[serde(default)]
    pub simulate: SimulateConfig,
    /// Analyzer and report parameters
    #[serde(default)]
    pub report: ReportConfig,
}

impl Config {
    /// Loads a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, FlowError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Absolute-or-relative path to the design sources.
    pub fn design_dir(&self) -> PathBuf {
        self.project.root.join(&self.project.design_dir)
    }

    /// Path to the testbench sources.
    pub fn verification_dir(&self) -> PathBuf {
        self.project.root.join(&self.project.verification_dir)
    }

    /// Path to the directory all run artifacts land in.
    pub fn sim_dir(&self) -> PathBuf {
        self.project.root.join(&self.project.sim_dir)
    }

    /// Path to the simulator Tcl scripts.
    pub fn scripts_dir(&self) -> PathBuf {
        self.project.root.join(&self.project.scripts_dir)
    }

    /// Destination directory for the plain-text source snapshot.
    pub fn export_dir(&self) -> PathBuf {
        self.project.root.join(&self.project.export_dir)
    }

    /// Path of the file remembering the last-selected testbench.
    pub fn state_file(&self) -> PathBuf {
        self.sim_dir().join(&self.simulate.state_file)
    }

    /// Path of the compile-step Tcl script.
    pub fn compile_script(&self) -> PathBuf {
        self.scripts_dir().join(&self.simulate.compile_script)
    }

    /// Path of the elaborate-step Tcl script.
    pub fn elaborate_script(&self) -> PathBuf {
        self.scripts_dir().join(&self.simulate.elaborate_script)
    }

    /// Path of the optional GUI wave-format script.
    pub fn wave_format_script(&self) -> PathBuf {
        self.scripts_dir().join(&self.simulate.wave_format_script)
    }

    /// Simulation transcript log for `test`.
    pub fn log_file(&self, test: &str) -> PathBuf {
        self.sim_dir().join(format!("{test}.log"))
    }

    /// Waveform database for `test` (opaque binary).
    pub fn wlf_file(&self, test: &str) -> PathBuf {
        self.sim_dir().join(format!("{test}.wlf"))
    }

    /// Coverage database for `test` (opaque binary, fed to the coverage tool).
    pub fn ucdb_file(&self, test: &str) -> PathBuf {
        self.sim_dir().join(format!("{test}.ucdb"))
    }

    /// Textual coverage report for `test`.
    pub fn coverage_report_file(&self, test: &str) -> PathBuf {
        self.sim_dir().join(format!("{test}_cov.rpt"))
    }
}

/// Project directory layout, all relative to `root`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Project root all other directories are resolved against
    #[serde(default = "ProjectConfig::default_root")]
    pub root: PathBuf,

    /// Design sources directory
    #[serde(default = "ProjectConfig::default_design_dir")]
    pub design_dir: String,

    /// Testbench sources directory
    #[serde(default = "ProjectConfig::default_verification_dir")]
    pub verification_dir: String,

    /// Run artifact directory
    #[serde(default = "ProjectConfig::default_sim_dir")]
    pub sim_dir: String,

    /// Simulator Tcl scripts directory
    #[serde(default = "ProjectConfig::default_scripts_dir")]
    pub scripts_dir: String,

    /// Plain-text snapshot destination
    #[serde(default = "ProjectConfig::default_export_dir")]
    pub export_dir: String,

    /// Testbench filename prefix
    #[serde(default = "ProjectConfig::default_tb_prefix")]
    pub tb_prefix: String,

    /// Testbench filename extension
    #[serde(default = "ProjectConfig::default_tb_extension")]
    pub tb_extension: String,
}

impl ProjectConfig {
    /// Returns the default project root (the working directory).
    fn default_root() -> PathBuf {
        PathBuf::from(".")
    }

    /// Returns the default design sources directory.
    fn default_design_dir() -> String {
        defaults::DESIGN_DIR.to_string()
    }

    /// Returns the default testbench sources directory.
    fn default_verification_dir() -> String {
        defaults::VERIFICATION_DIR.to_string()
    }

    /// Returns the default run artifact directory.
    fn default_sim_dir() -> String {
        defaults::SIM_DIR.to_string()
    }

    /// Returns the default scripts directory.
    fn default_scripts_dir() -> String {
        defaults::SCRIPTS_DIR.to_string()
    }

    /// Returns the default snapshot destination directory.
    fn default_export_dir() -> String {
        defaults::EXPORT_DIR.to_string()
    }

    /// Returns the default testbench filename prefix.
    fn default_tb_prefix() -> String {
        defaults::TB_PREFIX.to_string()
    }

    /// Returns the default testbench filename extension.
    fn default_tb_extension() -> String {
        defaults::TB_EXTENSION.to_string()
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: Self::default_root(),
            design_dir: defaults::DESIGN_DIR.to_string(),
            verification_dir: defaults::VERIFICATION_DIR.to_string(),
            sim_dir: defaults::SIM_DIR.to_string(),
            scripts_dir: defaults::SCRIPTS_DIR.to_string(),
            export_dir: defaults::EXPORT_DIR.to_string(),
            tb_prefix: defaults::TB_PREFIX.to_string(),
            tb_extension: defaults::TB_EXTENSION.to_string(),
        }
    }
}

/// External tool names and license settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolConfig {
    /// Simulator executable (compile, elaborate, simulate phases)
    #[serde(default = "ToolConfig::default_simulator")]
    pub simulator: String,

    /// Coverage report tool executable
    #[serde(default = "ToolConfig::default_coverage_tool")]
    pub coverage_tool: String,

    /// License server environment variable (informational only)
    #[serde(default = "ToolConfig::default_license_env")]
    pub license_env: String,
}

impl ToolConfig {
    /// Returns the default simulator executable name.
    fn default_simulator() -> String {
        defaults::SIMULATOR.to_string()
    }

    /// Returns the default coverage tool executable name.
    fn default_coverage_tool() -> String {
        defaults::COVERAGE_TOOL.to_string()
    }

    /// Returns the default license environment variable name.
    fn default_license_env() -> String {
        defaults::LICENSE_ENV.to_string()
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            simulator: defaults::SIMULATOR.to_string(),
            coverage_tool: defaults::COVERAGE_TOOL.to_string(),
            license_env: defaults::LICENSE_ENV.to_string(),
        }
    }
}

/// Simulate-step parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulateConfig {
    /// Random seed forwarded as `-sv_seed`
    #[serde(default = "SimulateConfig::default_seed")]
    pub seed: u32,

    /// Suffix forming the optimized top unit name from the testbench name
    #[serde(default = "SimulateConfig::default_opt_suffix")]
    pub opt_suffix: String,

    /// Library linked with `-L`
    #[serde(default = "SimulateConfig::default_design_lib")]
    pub design_lib: String,

    /// Library directories deleted by the pre-run cleanup
    #[serde(default = "SimulateConfig::default_work_libs")]
    pub work_libs: Vec<String>,

    /// Compile-step Tcl script filename
    #[serde(default = "SimulateConfig::default_compile_script")]
    pub compile_script: String,

    /// Elaborate-step Tcl script filename
    #[serde(default = "SimulateConfig::default_elaborate_script")]
    pub elaborate_script: String,

    /// Optional GUI wave-format script filename
    #[serde(default = "SimulateConfig::default_wave_format_script")]
    pub wave_format_script: String,

    /// Last-selected-test state filename
    #[serde(default = "SimulateConfig::default_state_file")]
    pub state_file: String,
}

impl SimulateConfig {
    /// Returns the default random seed.
    fn default_seed() -> u32 {
        defaults::SEED
    }

    /// Returns the default optimized-top suffix.
    fn default_opt_suffix() -> String {
        defaults::OPT_SUFFIX.to_string()
    }

    /// Returns the default linked library name.
    fn default_design_lib() -> String {
        defaults::DESIGN_LIB.to_string()
    }

    /// Returns the default set of library directories to clean.
    fn default_work_libs() -> Vec<String> {
        vec!["work".to_string(), defaults::DESIGN_LIB.to_string()]
    }

    /// Returns the default compile script filename.
    fn default_compile_script() -> String {
        defaults::COMPILE_SCRIPT.to_string()
    }

    /// Returns the default elaborate script filename.
    fn default_elaborate_script() -> String {
        defaults::ELABORATE_SCRIPT.to_string()
    }

    /// Returns the default wave-format script filename.
    fn default_wave_format_script() -> String {
        defaults::WAVE_FORMAT_SCRIPT.to_string()
    }

    /// Returns the default state filename.
    fn default_state_file() -> String {
        defaults::STATE_FILE.to_string()
    }
}

impl Default for SimulateConfig {
    fn default() -> Self {
        Self {
            seed: defaults::SEED,
            opt_suffix: defaults::OPT_SUFFIX.to_string(),
            design_lib: defaults::DESIGN_LIB.to_string(),
            work_libs: Self::default_work_libs(),
            compile_script: defaults::COMPILE_SCRIPT.to_string(),
            elaborate_script: defaults::ELABORATE_SCRIPT.to_string(),
            wave_format_script: defaults::WAVE_FORMAT_SCRIPT.to_string(),
            state_file: defaults::STATE_FILE.to_string(),
        }
    }
}

/// Analyzer and report parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Summary report filename, written next to the scanned log
    #[serde(default = "ReportConfig::default_summary_file")]
    pub summary_file: String,

    /// Maximum mismatch excerpts listed in the failure details
    #[serde(default = "ReportConfig::default_mismatch_display_cap")]
    pub mismatch_display_cap: usize,
}

impl ReportConfig {
    /// Returns the default summary report filename.
    fn default_summary_file() -> String {
        defaults::SUMMARY_FILE.to_string()
    }

    /// Returns the default mismatch listing cap.
    fn default_mismatch_display_cap() -> usize {
        defaults::MISMATCH_DISPLAY_CAP
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            summary_file: defaults::SUMMARY_FILE.to_string(),
            mismatch_display_cap: defaults::MISMATCH_DISPLAY_CAP,
        }
    }
}
