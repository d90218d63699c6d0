//! Common types shared by every stage of the toolkit.
//!
//! This module provides the fundamental building blocks used across the assembler,
//! trace parser, and replay engine. It includes:
//! 1. **Constants:** Word layout, nibble range, and RAM geometry.
//! 2. **Nibble:** A range-checked 4-bit value type.
//! 3. **Error Handling:** Assembly diagnostics, trace warnings, and session errors.

/// Machine-wide constants.
pub mod constants;

/// Error and diagnostic types.
pub mod error;

/// Range-checked 4-bit values.
pub mod nibble;

pub use constants::{NIBBLE_MAX, RAM_CELLS, WORD_MASK};
pub use error::{
    AsmError, AsmErrorKind, AssemblyErrors, ConfigError, ImageError, ReplayError, SessionError,
    SimError, SnapshotError, TraceWarning,
};
pub use nibble::Nibble;
