//! Persisted CPU state for single-instruction stepping.
//!
//! In single-step mode the simulator reads the CPU state from a small text file,
//! executes exactly one instruction, and writes the state back. The file has four
//! fixed lines:
//!
//! ```text
//! PC <decimal>
//! ACC <hex digit>
//! CARRY <0|1>
//! <16 space-separated hex digits, address 0 first>
//! ```
//!
//! Reading a missing file creates it with the all-zero state. Missing lines fall back
//! to their defaults and a short RAM line leaves the remaining cells at zero, but any
//! value that is present must be well-formed.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::common::{Nibble, RAM_CELLS, SnapshotError};

/// Architectural state of the 4-bit CPU between single steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CpuSnapshot {
    /// Address of the next instruction.
    pub pc: u32,
    /// Accumulator.
    pub acc: Nibble,
    /// Carry flag.
    pub carry: bool,
    /// RAM contents, address 0 first.
    pub ram: [Nibble; RAM_CELLS],
}

impl CpuSnapshot {
    /// Canonical file text.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Parses snapshot text.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Malformed`] when a present line has the wrong key or
    /// an invalid value.
    pub fn parse(text: &str) -> Result<Self, SnapshotError> {
        let mut snap = Self::default();
        let mut lines = text.lines();

        if let Some(value) = keyed_value(lines.next(), "PC", 1)? {
            snap.pc = value.parse().map_err(|_| SnapshotError::Malformed {
                line: 1,
                reason: format!("PC '{value}' is not a decimal number"),
            })?;
        }

        if let Some(value) = keyed_value(lines.next(), "ACC", 2)? {
            snap.acc = Nibble::from_hex(value).ok_or_else(|| SnapshotError::Malformed {
                line: 2,
                reason: format!("ACC '{value}' is not a hex digit"),
            })?;
        }

        if let Some(value) = keyed_value(lines.next(), "CARRY", 3)? {
            snap.carry = match value {
                "0" => false,
                "1" => true,
                other => {
                    return Err(SnapshotError::Malformed {
                        line: 3,
                        reason: format!("CARRY '{other}' is not 0 or 1"),
                    });
                }
            };
        }

        if let Some(ram_line) = lines.next() {
            for (cell, token) in snap.ram.iter_mut().zip(ram_line.split_whitespace()) {
                *cell = Nibble::from_hex(token).ok_or_else(|| SnapshotError::Malformed {
                    line: 4,
                    reason: format!("RAM value '{token}' is not a hex digit"),
                })?;
            }
        }

        Ok(snap)
    }
}

impl fmt::Display for CpuSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PC {}", self.pc)?;
        writeln!(f, "ACC {:X}", self.acc)?;
        writeln!(f, "CARRY {}", u8::from(self.carry))?;
        let ram: Vec<String> = self.ram.iter().map(|v| format!("{v:X}")).collect();
        writeln!(f, "{}", ram.join(" "))
    }
}

/// Value after `key` on a snapshot line; `None` if the line is absent or blank.
fn keyed_value<'a>(
    line: Option<&'a str>,
    key: &str,
    number: usize,
) -> Result<Option<&'a str>, SnapshotError> {
    let Some(line) = line.map(str::trim).filter(|l| !l.is_empty()) else {
        return Ok(None);
    };
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(k), Some(v)) if k == key => Ok(Some(v)),
        _ => Err(SnapshotError::Malformed {
            line: number,
            reason: format!("expected '{key} <value>', found '{line}'"),
        }),
    }
}

/// Owner of the snapshot file.
#[derive(Clone, Debug)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Creates a store for the file at `path`; nothing is touched until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Snapshot file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot, creating the file with zeros if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Io`] if the file cannot be read or created, and
    /// [`SnapshotError::Malformed`] if its content is invalid.
    pub fn read(&self) -> Result<CpuSnapshot, SnapshotError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => CpuSnapshot::parse(&text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no snapshot yet, writing zero state");
                let snap = CpuSnapshot::default();
                self.write(&snap)?;
                Ok(snap)
            }
            Err(source) => Err(self.io_error(source)),
        }
    }

    /// Overwrites the file with `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Io`] on write failure.
    pub fn write(&self, snapshot: &CpuSnapshot) -> Result<(), SnapshotError> {
        fs::write(&self.path, snapshot.render()).map_err(|source| self.io_error(source))
    }

    /// Ensures the stored PC addresses an instruction of a `program_len`-word program.
    ///
    /// A PC at or past the end is reset to 0 and persisted. Returns the snapshot that
    /// the next single step will start from.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::EmptyProgram`] when `program_len` is 0, plus any
    /// error from [`Self::read`] or [`Self::write`].
    pub fn clamp_pc(&self, program_len: usize) -> Result<CpuSnapshot, SnapshotError> {
        if program_len == 0 {
            return Err(SnapshotError::EmptyProgram);
        }
        let mut snap = self.read()?;
        if !usize::try_from(snap.pc).is_ok_and(|pc| pc < program_len) {
            warn!(
                pc = snap.pc,
                program_len, "snapshot PC is past the end of the program, resetting to 0"
            );
            snap.pc = 0;
            self.write(&snap)?;
        }
        Ok(snap)
    }

    /// Writes `value` into RAM cell `addr` of the stored snapshot.
    ///
    /// # Errors
    ///
    /// Propagates read and write failures.
    pub fn poke(&self, addr: Nibble, value: Nibble) -> Result<CpuSnapshot, SnapshotError> {
        let mut snap = self.read()?;
        snap.ram[addr.index()] = value;
        self.write(&snap)?;
        debug!(addr = addr.get(), value = value.get(), "snapshot RAM updated");
        Ok(snap)
    }

    /// Replaces the file with the all-zero state.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Io`] on write failure.
    pub fn reset(&self) -> Result<CpuSnapshot, SnapshotError> {
        let snap = CpuSnapshot::default();
        self.write(&snap)?;
        Ok(snap)
    }

    fn io_error(&self, source: io::Error) -> SnapshotError {
        SnapshotError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
