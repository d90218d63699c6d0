//! Replay counters.
//!
//! Tracks how many records of each kind the step engine has applied since the
//! current trace was loaded, for the end-of-run summary.

use std::fmt;

use serde::Serialize;

/// Counts of applied trace records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReplayStats {
    /// `Exec` records applied.
    pub execs: u64,
    /// `RamWrite` records applied.
    pub ram_writes: u64,
    /// `Done` records applied.
    pub halts: u64,
    /// Times stepping wrapped back to the first record.
    pub restarts: u64,
}

impl ReplayStats {
    /// Total records applied.
    pub const fn total(&self) -> u64 {
        self.execs + self.ram_writes + self.halts
    }

    /// Prints the summary to stdout.
    pub fn print(&self) {
        println!("{self}");
    }
}

impl fmt::Display for ReplayStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "REPLAY SUMMARY")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "records_applied          {}", self.total())?;
        writeln!(f, "  instructions           {}", self.execs)?;
        writeln!(f, "  ram_writes             {}", self.ram_writes)?;
        writeln!(f, "  halts                  {}", self.halts)?;
        write!(f, "restarts                 {}", self.restarts)
    }
}
