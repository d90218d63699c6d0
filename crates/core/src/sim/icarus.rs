//! Icarus Verilog simulator backend.
//!
//! A run has two phases, both executed with the workspace as working directory:
//! 1. **Compile:** `<compiler> -o <exe> -I <include> <testbench> <sources...>`
//! 2. **Execute:** `<runtime> <exe>` with stdout redirected into the log file.
//!
//! The runtime writes into a temporary file beside the log, which replaces the log
//! only when the run succeeds. A failed run leaves the previous log in place.
//!
//! The testbench reads the memory image, injection list, and snapshot by their
//! workspace-relative names, so the file names in the workspace configuration must
//! match what the testbench expects.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::common::SimError;
use crate::config::{SimulatorConfig, WorkspaceConfig};
use crate::sim::Simulator;

/// Runs the CPU testbenches through `iverilog` and `vvp` (or configured substitutes).
#[derive(Clone, Debug, Default)]
pub struct IcarusSimulator {
    config: SimulatorConfig,
}

impl IcarusSimulator {
    /// Creates a backend with the given tool and source configuration.
    pub const fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// The tool and source configuration.
    pub const fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    fn simulate(
        &self,
        workspace: &WorkspaceConfig,
        testbench: &Path,
        executable: &str,
    ) -> Result<String, SimError> {
        let compiler = locate(&self.config.compiler)?;
        let runtime = locate(&self.config.runtime)?;

        info!(
            testbench = %testbench.display(),
            dir = %workspace.dir.display(),
            "compiling simulation"
        );
        let mut compile = Command::new(&compiler);
        let _ = compile
            .current_dir(&workspace.dir)
            .arg("-o")
            .arg(executable)
            .arg("-I")
            .arg(&self.config.include_dir)
            .arg(testbench)
            .args(&self.config.sources);
        run(&mut compile, &self.config.compiler)?;

        let log_path = workspace.log_path();
        let io_error = |source: std::io::Error| SimError::Io {
            path: log_path.clone(),
            source,
        };
        let pending = NamedTempFile::new_in(&workspace.dir).map_err(io_error)?;
        let stdout = pending.as_file().try_clone().map_err(io_error)?;

        info!(log = %log_path.display(), "running simulation");
        let mut execute = Command::new(&runtime);
        let _ = execute
            .current_dir(&workspace.dir)
            .arg(executable)
            .stdout(Stdio::from(stdout));
        run(&mut execute, &self.config.runtime)?;

        let _ = pending
            .persist(&log_path)
            .map_err(|err| io_error(err.error))?;

        let text = fs::read_to_string(&log_path).map_err(|source| SimError::Io {
            path: log_path,
            source,
        })?;
        debug!(bytes = text.len(), "simulation log captured");
        Ok(text)
    }
}

impl Simulator for IcarusSimulator {
    fn run_full(&mut self, workspace: &WorkspaceConfig) -> Result<String, SimError> {
        let config = &self.config;
        self.simulate(workspace, &config.full_testbench, &config.full_executable)
    }

    fn run_single_step(&mut self, workspace: &WorkspaceConfig) -> Result<String, SimError> {
        let config = &self.config;
        self.simulate(workspace, &config.step_testbench, &config.step_executable)
    }
}

/// Resolves `tool` on `PATH`.
fn locate(tool: &str) -> Result<PathBuf, SimError> {
    which::which(tool).map_err(|_| SimError::ToolNotFound {
        tool: tool.to_string(),
    })
}

/// Runs `cmd` to completion, turning a non-zero exit into [`SimError::Failed`].
fn run(cmd: &mut Command, tool: &str) -> Result<(), SimError> {
    let out = cmd.output().map_err(|source| SimError::Spawn {
        tool: tool.to_string(),
        source,
    })?;
    if !out.status.success() {
        return Err(SimError::Failed {
            tool: tool.to_string(),
            status: out.status.to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }
    Ok(())
}
