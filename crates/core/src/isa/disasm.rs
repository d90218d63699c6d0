//! Instruction Disassembler.
//!
//! Converts packed words back into assembly text and formats program listings for
//! the command line and diagnostics.
//!
//! # Usage
//!
//! ```
//! use nibble_core::isa::{Word, disasm::disassemble};
//!
//! let word = Word::from_raw(0x6F0).unwrap();
//! assert_eq!(disassemble(word), "NOT 0xF");
//! ```

use crate::isa::{Mnemonic, Word};

/// Disassembles one word into source syntax.
///
/// Operands are printed in hex. The unassigned opcode `0b111` is rendered as a raw
/// `.word` directive so listings of arbitrary images never fail.
pub fn disassemble(word: Word) -> String {
    match word.mnemonic() {
        Some(Mnemonic::Not) => format!("NOT 0x{:X}", word.op1()),
        Some(m) => format!("{m} 0x{:X}, 0x{:X}", word.op1(), word.op2()),
        None => format!(".word 0x{:03x}", word.raw()),
    }
}

/// Formats one listing row: address, hex encoding, 11-bit binary, disassembly.
pub fn listing_row(address: usize, word: Word) -> String {
    format!(
        " {:02}   |   {:>3}   |   {}   |   {}",
        address,
        word.to_hex().to_uppercase(),
        word.to_binary(),
        disassemble(word)
    )
}

/// Formats a complete listing with a header and separator rules.
pub fn listing(words: &[Word]) -> String {
    const RULE: &str = "------------------------------------------------------------";
    let mut out = String::new();
    out.push_str(RULE);
    out.push('\n');
    out.push_str("ADDR |   HEX   |   BINARY (11-bit)   |   SOURCE\n");
    out.push_str(RULE);
    out.push('\n');
    for (address, word) in words.iter().enumerate() {
        out.push_str(&listing_row(address, *word));
        out.push('\n');
    }
    out.push_str(RULE);
    out.push('\n');
    out
}
