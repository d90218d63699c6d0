//! Single-pass assembler.
//!
//! This module turns mnemonic source text into packed words. It performs:
//! 1. **Comment stripping:** Everything from `;` or `//` to end of line is ignored.
//! 2. **Tokenising:** Lines split on whitespace and commas; the mnemonic is case-insensitive.
//! 3. **Validation:** Opcode lookup, arity, and strict 4-bit operand ranges.
//! 4. **Encoding:** Valid lines become [`Word`]s in source order.
//!
//! Errors never abort the pass. Every line is checked and all diagnostics are returned
//! together, so a mistake on line 2 does not hide another on line 9.

use tracing::debug;

use crate::asm::operand::parse_operand;
use crate::asm::program::Program;
use crate::common::{AsmError, AsmErrorKind, AssemblyErrors, Nibble};
use crate::isa::{Mnemonic, Word};

/// The result of one assembler pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assembly {
    /// Words for every line that assembled cleanly.
    pub program: Program,
    /// Diagnostics for every line that did not, in line order.
    pub errors: Vec<AsmError>,
}

impl Assembly {
    /// Returns `true` if no line produced a diagnostic.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts into the program, or into all diagnostics if there were any.
    ///
    /// A partially assembled program is never handed out; callers that persist a
    /// memory image should go through this method.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyErrors`] holding every diagnostic if any line failed.
    pub fn into_result(self) -> Result<Program, AssemblyErrors> {
        if self.errors.is_empty() {
            Ok(self.program)
        } else {
            Err(AssemblyErrors(self.errors))
        }
    }
}

/// Returns the code portion of a line: everything before the first `;` or `//`, trimmed.
pub fn strip_comment(line: &str) -> &str {
    let semi = line.find(';');
    let slashes = line.find("//");
    let cut = match (semi, slashes) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => line.len(),
    };
    line[..cut].trim()
}

/// Assembles a whole source text.
///
/// Blank and comment-only lines produce neither a word nor an error. Line numbers in
/// diagnostics are 1-based.
pub fn assemble(source: &str) -> Assembly {
    let mut words = Vec::new();
    let mut errors = Vec::new();

    for (idx, raw) in source.lines().enumerate() {
        match assemble_line(raw) {
            Ok(Some(word)) => words.push(word),
            Ok(None) => {}
            Err(kind) => errors.push(AsmError { line: idx + 1, kind }),
        }
    }

    debug!(
        words = words.len(),
        errors = errors.len(),
        "assembler pass finished"
    );

    Assembly {
        program: Program::from_words(words),
        errors,
    }
}

/// Assembles a single line.
///
/// Returns `Ok(None)` for blank or comment-only lines.
///
/// # Errors
///
/// Returns the first problem found on the line: unknown mnemonic, wrong operand count,
/// or an invalid operand.
pub fn assemble_line(raw: &str) -> Result<Option<Word>, AsmErrorKind> {
    let code = strip_comment(raw);
    if code.is_empty() {
        return Ok(None);
    }

    let mut tokens: Vec<&str> = code
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();
    // A separator run at either end still delimits an empty token.
    if code.starts_with(',') {
        tokens.insert(0, "");
    }
    if code.ends_with(',') {
        tokens.push("");
    }

    let Some((&head, operands)) = tokens.split_first() else {
        return Ok(None);
    };

    let mnemonic: Mnemonic = head
        .parse()
        .map_err(|()| AsmErrorKind::UnknownInstruction {
            mnemonic: head.to_uppercase(),
        })?;

    if operands.len() != mnemonic.arity() {
        return Err(AsmErrorKind::ArityMismatch {
            mnemonic,
            usage: mnemonic.usage(),
            found: operands.len(),
        });
    }

    let op1 = parse_operand(operands[0])?;
    let op2 = match operands.get(1) {
        Some(token) => parse_operand(token)?,
        None => Nibble::ZERO,
    };

    Ok(Some(Word::encode(mnemonic, op1, op2)))
}
