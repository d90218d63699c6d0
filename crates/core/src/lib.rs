//! 4-bit CPU assembler and trace replay library.
//!
//! This crate drives a minimal 4-bit teaching CPU whose hardware is simulated by an
//! external HDL simulator. It provides:
//! 1. **ISA:** The seven-instruction opcode table, 11-bit word encoding, and disassembly.
//! 2. **Assembler:** Collect-all validation of mnemonic source and memory image I/O.
//! 3. **Trace:** Parsing of the simulator's tagged log into execution records.
//! 4. **Replay:** A grouped step engine, memory injections, and replay statistics.
//! 5. **Session:** Full runs, injection with cursor restore, and snapshot single-stepping.
//!
//! The external simulator is reached only through the [`sim::Simulator`] trait.

/// Assembler, program container, and memory image I/O.
pub mod asm;
/// Common types and constants (nibbles, word layout, errors).
pub mod common;
/// Workspace file layout and simulator invocation settings.
pub mod config;
/// Instruction set (opcodes, word encoding, disassembly).
pub mod isa;
/// Step engine, observers, injections, and statistics.
pub mod replay;
/// Session state tying assembler, simulator, and replay together.
pub mod session;
/// External simulator capability and the Icarus backend.
pub mod sim;
/// Persisted CPU state for single-instruction stepping.
pub mod snapshot;
/// Simulator log records and parser.
pub mod trace;

/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// Interactive session; construct with `Session::new`.
pub use crate::session::Session;
/// Simulator capability implemented by backends and test doubles.
pub use crate::sim::Simulator;
