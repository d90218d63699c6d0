//! Configuration for the toolkit.
//!
//! This module defines where session files live and how the external simulator is
//! invoked. It provides:
//! 1. **Defaults:** File names and tool names matching the bundled hardware project.
//! 2. **Workspace:** The directory the simulator runs in and the files it exchanges.
//! 3. **Simulator:** Compiler, runtime, HDL sources, and testbenches.
//!
//! Configuration is supplied as JSON (every field optional) or taken from
//! `Config::default()`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::common::ConfigError;

/// Default configuration constants.
///
/// Relative paths are resolved against the workspace directory, which is also the
/// working directory of every simulator process.
mod defaults {
    /// Workspace directory.
    pub const WORKSPACE_DIR: &str = ".";

    /// Memory image read by the testbench.
    pub const PROGRAM_IMAGE: &str = "program.hex";

    /// Injection list read by the full-run testbench.
    pub const INJECTIONS: &str = "injections.txt";

    /// Simulator stdout capture.
    pub const LOG: &str = "simulation.log";

    /// CPU state exchanged with the single-step testbench.
    pub const SNAPSHOT: &str = "cpu_state.hex";

    /// Waveform dump written by the full-run testbench.
    pub const WAVEFORM: &str = "simulation.vcd";

    /// HDL compiler.
    pub const COMPILER: &str = "iverilog";

    /// Compiled-simulation runtime.
    pub const RUNTIME: &str = "vvp";

    /// Include directory passed to the compiler.
    pub const INCLUDE_DIR: &str = "../src";

    /// Testbench for full runs.
    pub const FULL_TESTBENCH: &str = "../testbench/bridge_tb.v";

    /// Testbench for single steps.
    pub const STEP_TESTBENCH: &str = "../testbench/bridge_tb_step.v";

    /// Compiled full-run simulation.
    pub const FULL_EXECUTABLE: &str = "cpu_sim";

    /// Compiled single-step simulation.
    pub const STEP_EXECUTABLE: &str = "cpu_sim_step";

    /// CPU design sources, in compile order.
    pub const SOURCES: [&str; 7] = [
        "../src/cpu_top.v",
        "../src/decoder_fsm.v",
        "../src/ram16x4.v",
        "../src/reg_alu4.v",
        "../src/full_adder4.v",
        "../src/full_adder1.v",
        "../src/xor_gate.v",
    ];
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use nibble_core::config::Config;
///
/// let json = r#"{
///     "workspace": { "dir": "/tmp/cpu", "log": "run.log" },
///     "simulator": { "compiler": "iverilog-12" }
/// }"#;
///
/// let config = Config::from_json_str(json).unwrap();
/// assert_eq!(config.workspace.log_path().to_str(), Some("/tmp/cpu/run.log"));
/// assert_eq!(config.workspace.snapshot, "cpu_state.hex");
/// assert_eq!(config.simulator.compiler, "iverilog-12");
/// assert_eq!(config.simulator.runtime, "vvp");
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Session files
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    /// External simulator invocation
    #[serde(default)]
    pub simulator: SimulatorConfig,
}

impl Config {
    /// Parses configuration JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for invalid JSON or mistyped fields.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Json`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

/// Location of every file a session reads or writes.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceConfig {
    /// Directory holding the session files; simulator working directory
    #[serde(default = "WorkspaceConfig::default_dir")]
    pub dir: PathBuf,

    /// Memory image file name
    #[serde(default = "WorkspaceConfig::default_program_image")]
    pub program_image: String,

    /// Injection list file name
    #[serde(default = "WorkspaceConfig::default_injections")]
    pub injections: String,

    /// Simulator log file name
    #[serde(default = "WorkspaceConfig::default_log")]
    pub log: String,

    /// CPU snapshot file name
    #[serde(default = "WorkspaceConfig::default_snapshot")]
    pub snapshot: String,

    /// Waveform file name
    #[serde(default = "WorkspaceConfig::default_waveform")]
    pub waveform: String,
}

impl WorkspaceConfig {
    /// Creates the default layout rooted at `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    /// Full path of the memory image.
    pub fn program_image_path(&self) -> PathBuf {
        self.dir.join(&self.program_image)
    }

    /// Full path of the injection list.
    pub fn injections_path(&self) -> PathBuf {
        self.dir.join(&self.injections)
    }

    /// Full path of the simulator log.
    pub fn log_path(&self) -> PathBuf {
        self.dir.join(&self.log)
    }

    /// Full path of the CPU snapshot.
    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.join(&self.snapshot)
    }

    /// Full path of the waveform dump.
    pub fn waveform_path(&self) -> PathBuf {
        self.dir.join(&self.waveform)
    }

    fn default_dir() -> PathBuf {
        PathBuf::from(defaults::WORKSPACE_DIR)
    }

    fn default_program_image() -> String {
        defaults::PROGRAM_IMAGE.to_string()
    }

    fn default_injections() -> String {
        defaults::INJECTIONS.to_string()
    }

    fn default_log() -> String {
        defaults::LOG.to_string()
    }

    fn default_snapshot() -> String {
        defaults::SNAPSHOT.to_string()
    }

    fn default_waveform() -> String {
        defaults::WAVEFORM.to_string()
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            dir: Self::default_dir(),
            program_image: Self::default_program_image(),
            injections: Self::default_injections(),
            log: Self::default_log(),
            snapshot: Self::default_snapshot(),
            waveform: Self::default_waveform(),
        }
    }
}

/// How to compile and run the hardware simulation.
///
/// Source and testbench paths are relative to the workspace directory.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulatorConfig {
    /// HDL compiler executable
    #[serde(default = "SimulatorConfig::default_compiler")]
    pub compiler: String,

    /// Runtime executable for the compiled simulation
    #[serde(default = "SimulatorConfig::default_runtime")]
    pub runtime: String,

    /// Include directory (`-I`)
    #[serde(default = "SimulatorConfig::default_include_dir")]
    pub include_dir: PathBuf,

    /// CPU design sources
    #[serde(default = "SimulatorConfig::default_sources")]
    pub sources: Vec<PathBuf>,

    /// Testbench for full runs
    #[serde(default = "SimulatorConfig::default_full_testbench")]
    pub full_testbench: PathBuf,

    /// Testbench for single steps
    #[serde(default = "SimulatorConfig::default_step_testbench")]
    pub step_testbench: PathBuf,

    /// Output of compiling the full-run testbench
    #[serde(default = "SimulatorConfig::default_full_executable")]
    pub full_executable: String,

    /// Output of compiling the single-step testbench
    #[serde(default = "SimulatorConfig::default_step_executable")]
    pub step_executable: String,
}

impl SimulatorConfig {
    fn default_compiler() -> String {
        defaults::COMPILER.to_string()
    }

    fn default_runtime() -> String {
        defaults::RUNTIME.to_string()
    }

    fn default_include_dir() -> PathBuf {
        PathBuf::from(defaults::INCLUDE_DIR)
    }

    fn default_sources() -> Vec<PathBuf> {
        defaults::SOURCES.iter().map(PathBuf::from).collect()
    }

    fn default_full_testbench() -> PathBuf {
        PathBuf::from(defaults::FULL_TESTBENCH)
    }

    fn default_step_testbench() -> PathBuf {
        PathBuf::from(defaults::STEP_TESTBENCH)
    }

    fn default_full_executable() -> String {
        defaults::FULL_EXECUTABLE.to_string()
    }

    fn default_step_executable() -> String {
        defaults::STEP_EXECUTABLE.to_string()
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            compiler: Self::default_compiler(),
            runtime: Self::default_runtime(),
            include_dir: Self::default_include_dir(),
            sources: Self::default_sources(),
            full_testbench: Self::default_full_testbench(),
            step_testbench: Self::default_step_testbench(),
            full_executable: Self::default_full_executable(),
            step_executable: Self::default_step_executable(),
        }
    }
}
