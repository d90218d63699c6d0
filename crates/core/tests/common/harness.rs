use std::fs;
use std::path::PathBuf;

use nibble_core::Session;
use nibble_core::config::WorkspaceConfig;
use nibble_core::sim::Simulator;
use tempfile::TempDir;

/// Five valid instructions with comments and a blank line mixed in.
pub const FIVE_LINE_PROGRAM: &str = "\
; load two values and combine them
STO 0x4 0x5
ADD 4, 6      // acc += ram[4] + 6

SUB 0b0100 1
XOR 0xa 0xB
NOT 0xF
";

/// `Exec(pc=0)`, `RamWrite(7, 2)`, `Exec(pc=1)`, `Done`.
pub const GROUPED_LOG: &str = "\
VCD info: dumpfile simulation.vcd opened for output.
[EXEC] PC:0 | Op:STO | Dest:7 | Src:2
[RAM] Addr:7 Val:2
[EXEC] PC:1 | Op:NOT | Dest:7 | Src:0
[DONE]
";

/// Three instructions, each followed by one RAM write, then a halt.
pub const SIX_STEP_LOG: &str = "\
[EXEC] PC:0 | Op:STO | Dest:1 | Src:3
[RAM] Addr:1 Val:3
[EXEC] PC:1 | Op:ADD | Dest:1 | Src:1
[RAM] Addr:1 Val:4
[EXEC] PC:2 | Op:NOT | Dest:1 | Src:0
[DONE]
";

/// A temporary directory laid out as a session workspace.
pub struct Workspace {
    dir: TempDir,
    config: WorkspaceConfig,
}

impl Workspace {
    pub fn new() -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let dir = TempDir::new().unwrap();
        let config = WorkspaceConfig::in_dir(dir.path());
        Self { dir, config }
    }

    pub const fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub fn session<S: Simulator>(&self, sim: S) -> Session<S> {
        Session::new(sim, self.config.clone())
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path(name)).unwrap()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path(name).exists()
    }

    pub fn write(&self, name: &str, text: &str) {
        fs::write(self.path(name), text).unwrap();
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}
