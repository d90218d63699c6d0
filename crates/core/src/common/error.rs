//! Error and diagnostic definitions.
//!
//! This module collects every error type raised by the toolkit. It provides:
//! 1. **Assembly Errors:** Per-line diagnostics, aggregated rather than fail-fast.
//! 2. **Trace Warnings:** Malformed simulator log records that were skipped.
//! 3. **External Errors:** Simulator process failures, kept distinct from local I/O.
//! 4. **Session Errors:** The umbrella type returned by `Session` operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::isa::Mnemonic;

/// The reason a single source line failed to assemble.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AsmErrorKind {
    /// The first token is not in the opcode table.
    #[error("unknown instruction '{mnemonic}'")]
    UnknownInstruction {
        /// The mnemonic as written, uppercased.
        mnemonic: String,
    },

    /// The instruction has the wrong number of operands.
    #[error("invalid syntax for {mnemonic}: expected `{usage}`, found {found} operand(s)")]
    ArityMismatch {
        /// The recognised instruction.
        mnemonic: Mnemonic,
        /// Usage string, e.g. `NOT <op1>`.
        usage: &'static str,
        /// Number of operand tokens actually present.
        found: usize,
    },

    /// The operand parsed but does not fit in four bits.
    #[error("immediate value out of 4-bit range (0-F): {token}")]
    ImmediateOutOfRange {
        /// The offending token as written.
        token: String,
    },

    /// The operand is not a number in any supported base.
    #[error("invalid number '{token}'")]
    NumberFormatError {
        /// The offending token as written.
        token: String,
    },
}

impl AsmErrorKind {
    /// Returns the operand token this error refers to, if any.
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::ImmediateOutOfRange { token } | Self::NumberFormatError { token } => Some(token),
            Self::UnknownInstruction { .. } | Self::ArityMismatch { .. } => None,
        }
    }
}

/// An assembly diagnostic tied to a 1-based source line.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("Line {line}: {kind}")]
pub struct AsmError {
    /// 1-based line number in the source text.
    pub line: usize,
    /// What went wrong on that line.
    pub kind: AsmErrorKind,
}

impl AsmError {
    /// Human-readable message without the line prefix.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Every diagnostic produced by one assembler pass.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("assembly failed with {} error(s)", .0.len())]
pub struct AssemblyErrors(pub Vec<AsmError>);

impl AssemblyErrors {
    /// Iterates over the individual diagnostics in line order.
    pub fn iter(&self) -> std::slice::Iter<'_, AsmError> {
        self.0.iter()
    }
}

/// A tagged simulator log line whose fields could not be extracted.
///
/// The record is skipped; parsing continues with the next line.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("log line {line}: malformed {tag} record: {reason}")]
pub struct TraceWarning {
    /// 1-based line number in the log.
    pub line: usize,
    /// The tag that matched (`[EXEC]` or `[RAM]`).
    pub tag: &'static str,
    /// Why extraction failed.
    pub reason: String,
}

/// Errors reading a memory image back from disk.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The file could not be read or written.
    #[error("failed to access memory image {}: {source}", .path.display())]
    Io {
        /// Image path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A line is not a 3-digit hex word in `0..=0x7FF`.
    #[error("memory image line {line}: '{text}' is not an 11-bit hex word")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// The offending text.
        text: String,
    },
}

/// Failures of the external hardware simulator.
///
/// These are the only errors that stop an operation outright; the session state is
/// left exactly as it was before the call.
#[derive(Debug, Error)]
pub enum SimError {
    /// A required executable is not on `PATH`.
    #[error("simulator tool '{tool}' was not found in PATH")]
    ToolNotFound {
        /// Executable name.
        tool: String,
    },

    /// The executable exists but could not be started.
    #[error("failed to launch '{tool}': {source}")]
    Spawn {
        /// Executable name.
        tool: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The process ran and exited unsuccessfully.
    #[error("'{tool}' failed ({status}): {stderr}")]
    Failed {
        /// Executable name.
        tool: String,
        /// Exit status as reported by the OS.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// Reading or writing a file the simulator exchanges with us failed.
    #[error("simulator I/O on {}: {source}", .path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Errors reading or writing the CPU snapshot file.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot file could not be read or written.
    #[error("snapshot I/O on {}: {source}", .path.display())]
    Io {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A snapshot line has an unexpected shape or value.
    #[error("snapshot line {line}: {reason}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        reason: String,
    },

    /// Single stepping needs at least one instruction.
    #[error("program is empty; assemble a program before stepping")]
    EmptyProgram,
}

/// Errors raised by the step engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ReplayError {
    /// No trace has been loaded yet.
    #[error("no execution trace loaded; run the program first")]
    NoTrace,
}

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        /// Config path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The file is not valid configuration JSON.
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors returned by `Session` operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The program has assembly errors; nothing was written.
    #[error(transparent)]
    Assembly(#[from] AssemblyErrors),

    /// The external simulator failed.
    #[error(transparent)]
    Simulation(#[from] SimError),

    /// The snapshot file could not be used.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// The step engine refused the operation.
    #[error(transparent)]
    Replay(#[from] ReplayError),

    /// The memory image could not be written.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// A session-owned file could not be written or removed.
    #[error("failed to update {}: {source}", .path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A user-supplied address or value does not fit in four bits.
    #[error("{what} {value:#x} is outside 0x0..=0xF")]
    InvalidNibble {
        /// Which field was invalid (`"address"` or `"value"`).
        what: &'static str,
        /// The rejected value.
        value: u8,
    },

    /// No waveform file exists yet.
    #[error("no waveform found at {}; run the program first", .path.display())]
    NoWaveform {
        /// Expected waveform path.
        path: PathBuf,
    },
}
