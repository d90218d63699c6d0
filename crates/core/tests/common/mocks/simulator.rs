use mockall::mock;
use nibble_core::common::SimError;
use nibble_core::config::WorkspaceConfig;
use nibble_core::sim::Simulator;

mock! {
    pub Sim {}
    impl Simulator for Sim {
        fn run_full(&mut self, workspace: &WorkspaceConfig) -> Result<String, SimError>;
        fn run_single_step(&mut self, workspace: &WorkspaceConfig) -> Result<String, SimError>;
    }
}

impl MockSim {
    /// A simulator whose every full run prints `log`.
    pub fn full_runs_print(log: &'static str) -> Self {
        let mut sim = Self::new();
        let _ = sim.expect_run_full()
            .returning(move |_| Ok(log.to_string()));
        sim
    }
}

/// The error a missing `iverilog` produces.
pub fn tool_missing() -> SimError {
    SimError::ToolNotFound {
        tool: "iverilog".to_string(),
    }
}
