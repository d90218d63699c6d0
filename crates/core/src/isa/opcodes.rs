//! Opcode table.
//!
//! Defines the seven mnemonics of the 4-bit CPU and their 3-bit opcodes. The table is
//! fixed: opcode `0b111` is unassigned.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An instruction mnemonic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mnemonic {
    /// Store `op2` into RAM cell `op1`.
    Sto,
    /// Add.
    Add,
    /// Subtract.
    Sub,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Bitwise XOR.
    Xor,
    /// Bitwise NOT of RAM cell `op1`; takes a single operand.
    Not,
}

impl Mnemonic {
    /// Every mnemonic in opcode order.
    pub const ALL: [Self; 7] = [
        Self::Sto,
        Self::Add,
        Self::Sub,
        Self::And,
        Self::Or,
        Self::Xor,
        Self::Not,
    ];

    /// Returns the 3-bit opcode.
    #[inline]
    pub const fn opcode(self) -> u8 {
        match self {
            Self::Sto => 0b000,
            Self::Add => 0b001,
            Self::Sub => 0b010,
            Self::And => 0b011,
            Self::Or => 0b100,
            Self::Xor => 0b101,
            Self::Not => 0b110,
        }
    }

    /// Looks up the mnemonic for a 3-bit opcode; `0b111` has none.
    pub const fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            0b000 => Some(Self::Sto),
            0b001 => Some(Self::Add),
            0b010 => Some(Self::Sub),
            0b011 => Some(Self::And),
            0b100 => Some(Self::Or),
            0b101 => Some(Self::Xor),
            0b110 => Some(Self::Not),
            _ => None,
        }
    }

    /// Number of operand tokens the instruction takes in source text.
    #[inline]
    pub const fn arity(self) -> usize {
        match self {
            Self::Not => 1,
            _ => 2,
        }
    }

    /// Canonical uppercase spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sto => "STO",
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Xor => "XOR",
            Self::Not => "NOT",
        }
    }

    /// Usage line shown in arity diagnostics.
    pub const fn usage(self) -> &'static str {
        match self {
            Self::Sto => "STO <op1> <op2>",
            Self::Add => "ADD <op1> <op2>",
            Self::Sub => "SUB <op1> <op2>",
            Self::And => "AND <op1> <op2>",
            Self::Or => "OR <op1> <op2>",
            Self::Xor => "XOR <op1> <op2>",
            Self::Not => "NOT <op1>",
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mnemonic {
    type Err = ();

    /// Case-insensitive lookup.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}
