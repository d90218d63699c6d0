//! Execution trace records.
//!
//! Records are produced only by the trace parser, in log order, and are never edited
//! afterwards. A new simulator run always yields a brand-new [`Trace`].

use serde::Serialize;

use crate::common::Nibble;

/// One executed instruction as reported by the simulator.
///
/// `op`, `dest`, and `src` are kept as the simulator printed them; only the PC is
/// interpreted, because injection targeting and source highlighting need it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExecRecord {
    /// Program counter of the instruction (decimal in the log).
    pub pc: u32,
    /// Mnemonic text.
    pub op: String,
    /// Destination field text.
    pub dest: String,
    /// Source field text.
    pub src: String,
}

/// A single simulator event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStep {
    /// An instruction executed.
    Exec(ExecRecord),
    /// A RAM cell changed.
    RamWrite {
        /// Cell address.
        addr: Nibble,
        /// New cell value.
        val: Nibble,
    },
    /// The program halted.
    Done,
}

impl ExecutionStep {
    /// Returns the record if this is an `Exec` step.
    pub const fn as_exec(&self) -> Option<&ExecRecord> {
        match self {
            Self::Exec(rec) => Some(rec),
            Self::RamWrite { .. } | Self::Done => None,
        }
    }

    /// Returns `true` for `Exec` steps.
    pub const fn is_exec(&self) -> bool {
        matches!(self, Self::Exec(_))
    }
}

/// An ordered sequence of execution steps for one simulator run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Trace {
    steps: Vec<ExecutionStep>,
}

impl Trace {
    /// Wraps steps already in log order.
    pub const fn from_steps(steps: Vec<ExecutionStep>) -> Self {
        Self { steps }
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the trace has no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Record at `index`.
    pub fn get(&self, index: usize) -> Option<&ExecutionStep> {
        self.steps.get(index)
    }

    /// All records in log order.
    pub fn steps(&self) -> &[ExecutionStep] {
        &self.steps
    }

    /// Iterates over the records in log order.
    pub fn iter(&self) -> std::slice::Iter<'_, ExecutionStep> {
        self.steps.iter()
    }

    /// PC of the nearest `Exec` at or before `index`, if any.
    pub fn pc_at_or_before(&self, index: usize) -> Option<u32> {
        let end = index.saturating_add(1).min(self.steps.len());
        self.steps[..end]
            .iter()
            .rev()
            .find_map(ExecutionStep::as_exec)
            .map(|rec| rec.pc)
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a ExecutionStep;
    type IntoIter = std::slice::Iter<'a, ExecutionStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
