//! Program-counter to source-line mapping.
//!
//! The simulator reports a PC; the front end wants to highlight the line that
//! produced that instruction. Instruction `n` is the `n`-th line (0-based) whose
//! comment-stripped text is non-empty.

use crate::asm::assembler::strip_comment;

/// Maps instruction addresses to 1-based source line numbers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceMap {
    lines: Vec<usize>,
}

impl SourceMap {
    /// Builds the map for `source`.
    pub fn new(source: &str) -> Self {
        let lines = source
            .lines()
            .enumerate()
            .filter(|(_, text)| !strip_comment(text).is_empty())
            .map(|(idx, _)| idx + 1)
            .collect();
        Self { lines }
    }

    /// Source line for `pc`, or `None` if the PC is past the last instruction.
    pub fn line_for_pc(&self, pc: u32) -> Option<usize> {
        usize::try_from(pc).ok().and_then(|i| self.lines.get(i).copied())
    }

    /// Number of instruction lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if the source has no instruction lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
