//! Global Machine Constants.
//!
//! This module defines the fixed widths and sizes of the 4-bit teaching CPU. It includes:
//! 1. **Data Constants:** Nibble range and RAM geometry.
//! 2. **Instruction Constants:** Field shifts and masks of the 11-bit instruction word.
//! 3. **Text Constants:** Widths used by the memory image and snapshot formats.

/// Largest value representable by a 4-bit operand, RAM cell, or accumulator.
pub const NIBBLE_MAX: u8 = 0xF;

/// Number of 4-bit cells in the data RAM.
pub const RAM_CELLS: usize = 16;

/// Width of a packed instruction word in bits.
pub const WORD_BITS: u32 = 11;

/// Mask covering every valid bit of a packed instruction word.
pub const WORD_MASK: u16 = 0x7FF;

/// Bit position of the 3-bit opcode field within a word.
pub const OPCODE_SHIFT: u16 = 8;

/// Mask for the opcode field after shifting it down.
pub const OPCODE_MASK: u16 = 0x7;

/// Bit position of the first operand within a word.
pub const OP1_SHIFT: u16 = 4;

/// Mask for a single 4-bit operand field after shifting it down.
pub const OPERAND_MASK: u16 = 0xF;

/// Number of hex digits used to render one word in the memory image.
pub const WORD_HEX_DIGITS: usize = 3;
