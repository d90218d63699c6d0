//! # ISA Tests
//!
//! Opcode table round trips, word field extraction, and listing output.

use nibble_core::common::Nibble;
use nibble_core::isa::disasm::{disassemble, listing, listing_row};
use nibble_core::isa::{Mnemonic, Word};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_opcode_table_round_trips() {
    for (expected, m) in Mnemonic::ALL.into_iter().enumerate() {
        assert_eq!(usize::from(m.opcode()), expected);
        assert_eq!(Mnemonic::from_opcode(m.opcode()), Some(m));
        assert_eq!(m.as_str().parse::<Mnemonic>(), Ok(m));
        assert_eq!(m.as_str().to_lowercase().parse::<Mnemonic>(), Ok(m));
    }
    assert_eq!(Mnemonic::from_opcode(7), None);
}

#[test]
fn test_word_fields() {
    let w = Word::encode(
        Mnemonic::Xor,
        Nibble::new(0xA).unwrap(),
        Nibble::new(0x3).unwrap(),
    );
    assert_eq!(w.raw(), 0x5A3);
    assert_eq!(w.opcode(), 5);
    assert_eq!(w.mnemonic(), Some(Mnemonic::Xor));
    assert_eq!(w.op1().get(), 0xA);
    assert_eq!(w.op2().get(), 0x3);
    assert_eq!(w.to_hex(), "5a3");
    assert_eq!(w.to_binary(), "10110100011");
}

#[rstest]
#[case("000", Some(0x000))]
#[case("6F0", Some(0x6F0))]
#[case("7ff", Some(0x7FF))]
#[case("800", None)]
#[case("0045", None)]
#[case("xyz", None)]
fn test_word_from_hex(#[case] text: &str, #[case] expected: Option<u16>) {
    assert_eq!(Word::from_hex(text).map(Word::raw), expected);
}

#[rstest]
#[case(0x045, "STO 0x4, 0x5")]
#[case(0x6F0, "NOT 0xF")]
#[case(0x1A3, "ADD 0xA, 0x3")]
#[case(0x7AB, ".word 0x7ab")]
fn test_disassemble(#[case] raw: u16, #[case] text: &str) {
    assert_eq!(disassemble(Word::from_raw(raw).unwrap()), text);
}

#[test]
fn test_listing_has_one_row_per_word() {
    let words = [
        Word::from_raw(0x045).unwrap(),
        Word::from_raw(0x6F0).unwrap(),
    ];
    let text = listing(&words);
    assert!(text.contains(&listing_row(0, words[0])));
    assert!(text.contains(&listing_row(1, words[1])));
    assert!(listing_row(1, words[1]).contains("6F0"));
    assert!(listing_row(1, words[1]).contains("11011110000"));
}
