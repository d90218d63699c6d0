//! Error and summary printing shared by the subcommands.

use nibble_core::common::{AssemblyErrors, SessionError, TraceWarning};

/// Prints every assembly diagnostic, one per line, in source order.
pub fn print_assembly_errors(errors: &AssemblyErrors) {
    for err in errors.iter() {
        eprintln!("[ASM ERROR] {err}");
    }
}

/// Prints skipped trace records.
pub fn print_trace_warnings(warnings: &[TraceWarning]) {
    for warning in warnings {
        eprintln!("[PARSE ERROR] {warning}");
    }
}

/// Prints a failed command, expanding assembly errors line by line.
pub fn print_session_error(err: &anyhow::Error) {
    match err.downcast_ref::<SessionError>() {
        Some(SessionError::Assembly(errors)) => print_assembly_errors(errors),
        Some(SessionError::Simulation(sim)) => eprintln!("[SIM ERROR] {sim}"),
        _ => eprintln!("[ERROR] {err:#}"),
    }
}
