//! Manual memory injections.
//!
//! An injection asks the simulator to overwrite a RAM cell when execution reaches a
//! given program counter. The list is append-only between runs and is rewritten in
//! full on every change, one `<decimal pc> <hex addr> <hex value>` line per entry.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::common::Nibble;

/// One requested RAM write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Injection {
    /// PC at which the simulator applies the write.
    pub target_pc: u32,
    /// RAM cell.
    pub addr: Nibble,
    /// New value.
    pub value: Nibble,
}

impl fmt::Display for Injection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:x} {:x}", self.target_pc, self.addr, self.value)
    }
}

/// Ordered injection list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InjectionList {
    entries: Vec<Injection>,
}

impl InjectionList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an injection.
    pub fn push(&mut self, injection: Injection) {
        debug!(%injection, "injection recorded");
        self.entries.push(injection);
    }

    /// Number of injections.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been injected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Injections in the order they were made.
    pub fn iter(&self) -> std::slice::Iter<'_, Injection> {
        self.entries.iter()
    }

    /// File text for the whole list; empty when the list is empty.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|inj| format!("{inj}\n"))
            .collect()
    }

    /// Overwrites `path` with the whole list.
    ///
    /// # Errors
    ///
    /// Propagates the write failure.
    pub fn persist(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.render())
    }

    /// Forgets every injection in memory.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a InjectionList {
    type Item = &'a Injection;
    type IntoIter = std::slice::Iter<'a, Injection>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Removes `path`, treating a missing file as success.
///
/// # Errors
///
/// Propagates any failure other than `NotFound`.
pub fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}
