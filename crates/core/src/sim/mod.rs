//! External hardware simulator capability.
//!
//! The toolkit never simulates the CPU itself. It hands the memory image, injection
//! list, or snapshot to an external simulator and reads back the log. This module
//! provides:
//! 1. **Capability:** The [`Simulator`] trait with a full run and a single step.
//! 2. **Icarus Backend:** [`IcarusSimulator`], which compiles and runs the HDL testbenches.
//!
//! Both operations block until the external process exits. There is no timeout.

/// Icarus Verilog backend.
pub mod icarus;

pub use icarus::IcarusSimulator;

use crate::common::SimError;
use crate::config::WorkspaceConfig;

/// Runs the external simulator against the files in a workspace.
///
/// Implementations read their inputs from the paths named by `workspace` and return
/// the complete log text. On error nothing is returned and callers must leave their
/// state untouched.
pub trait Simulator {
    /// Runs the whole program from reset.
    ///
    /// Inputs: the memory image and the injection list. May also leave a waveform
    /// dump in the workspace.
    ///
    /// # Errors
    ///
    /// Returns a [`SimError`] if the simulator is missing or fails.
    fn run_full(&mut self, workspace: &WorkspaceConfig) -> Result<String, SimError>;

    /// Executes exactly one instruction starting from the persisted snapshot, which
    /// the simulator updates in place.
    ///
    /// # Errors
    ///
    /// Returns a [`SimError`] if the simulator is missing or fails.
    fn run_single_step(&mut self, workspace: &WorkspaceConfig) -> Result<String, SimError>;
}

impl<T: Simulator + ?Sized> Simulator for Box<T> {
    fn run_full(&mut self, workspace: &WorkspaceConfig) -> Result<String, SimError> {
        (**self).run_full(workspace)
    }

    fn run_single_step(&mut self, workspace: &WorkspaceConfig) -> Result<String, SimError> {
        (**self).run_single_step(workspace)
    }
}
