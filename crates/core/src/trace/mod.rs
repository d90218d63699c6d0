//! Simulator trace records and the log parser.
//!
//! A trace is rebuilt from scratch on every parse; it is never appended to.

/// Log text to trace conversion.
pub mod parser;

/// `ExecutionStep`, `ExecRecord`, and `Trace`.
pub mod step;

pub use parser::{DONE_TAG, EXEC_TAG, ParsedLog, RAM_TAG, parse_log};
pub use step::{ExecRecord, ExecutionStep, Trace};
