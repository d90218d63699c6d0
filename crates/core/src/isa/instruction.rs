//! Instruction word encoding and field extraction.
//!
//! A word is 11 bits wide:
//!
//! ```text
//!  10    8 7     4 3     0
//! +-------+-------+-------+
//! | opcode|  op1  |  op2  |
//! +-------+-------+-------+
//! ```
//!
//! `NOT` always encodes `op2 = 0`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::Nibble;
use crate::common::constants::{
    OP1_SHIFT, OPCODE_MASK, OPCODE_SHIFT, OPERAND_MASK, WORD_BITS, WORD_HEX_DIGITS, WORD_MASK,
};
use crate::isa::Mnemonic;

/// A packed 11-bit machine word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Word(u16);

impl Word {
    /// Packs an instruction. `op2` is ignored for `NOT`.
    pub const fn encode(mnemonic: Mnemonic, op1: Nibble, op2: Nibble) -> Self {
        let op2 = match mnemonic {
            Mnemonic::Not => 0,
            _ => op2.get() as u16,
        };
        Self(((mnemonic.opcode() as u16) << OPCODE_SHIFT) | ((op1.get() as u16) << OP1_SHIFT) | op2)
    }

    /// Wraps a raw value, returning `None` if any bit above bit 10 is set.
    pub const fn from_raw(raw: u16) -> Option<Self> {
        if raw & !WORD_MASK == 0 {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// Returns the raw 11-bit value.
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Extracts the 3-bit opcode field.
    #[inline]
    pub const fn opcode(self) -> u8 {
        ((self.0 >> OPCODE_SHIFT) & OPCODE_MASK) as u8
    }

    /// Decodes the opcode field, `None` for the unassigned opcode.
    #[inline]
    pub const fn mnemonic(self) -> Option<Mnemonic> {
        Mnemonic::from_opcode(self.opcode())
    }

    /// Extracts the first operand field.
    #[inline]
    pub const fn op1(self) -> Nibble {
        Nibble::truncate((self.0 >> OP1_SHIFT) & OPERAND_MASK)
    }

    /// Extracts the second operand field.
    #[inline]
    pub const fn op2(self) -> Nibble {
        Nibble::truncate(self.0 & OPERAND_MASK)
    }

    /// Renders the word as exactly three lowercase hex digits, e.g. `"045"`.
    pub fn to_hex(self) -> String {
        format!("{:0width$x}", self.0, width = WORD_HEX_DIGITS)
    }

    /// Renders the word as an 11-character binary string.
    pub fn to_binary(self) -> String {
        format!("{:0width$b}", self.0, width = WORD_BITS as usize)
    }

    /// Parses a memory image line such as `"6f0"`.
    pub fn from_hex(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() || text.len() > WORD_HEX_DIGITS {
            return None;
        }
        u16::from_str_radix(text, 16).ok().and_then(Self::from_raw)
    }
}

impl From<Word> for u16 {
    fn from(w: Word) -> Self {
        w.0
    }
}

impl fmt::LowerHex for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}
