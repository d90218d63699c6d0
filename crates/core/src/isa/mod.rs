//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the opcode table, the 11-bit word layout, and the disassembler for the
//! 4-bit CPU.
//!
//! # Instruction set
//!
//! | Mnemonic | Opcode | Operands   |
//! |----------|--------|------------|
//! | `STO`    | `000`  | `op1, op2` |
//! | `ADD`    | `001`  | `op1, op2` |
//! | `SUB`    | `010`  | `op1, op2` |
//! | `AND`    | `011`  | `op1, op2` |
//! | `OR`     | `100`  | `op1, op2` |
//! | `XOR`    | `101`  | `op1, op2` |
//! | `NOT`    | `110`  | `op1`      |

/// Word disassembly and program listings.
pub mod disasm;

/// Word encoding and field extraction.
pub mod instruction;

/// Mnemonic and opcode table.
pub mod opcodes;

pub use instruction::Word;
pub use opcodes::Mnemonic;
