//! # Assembler Tests
//!
//! Encoding of every instruction form, each diagnostic kind with its line and token,
//! the collect-all error policy, and operand parsing across all bases.

use nibble_core::asm::{assemble, assemble_line, parse_operand, strip_comment};
use nibble_core::common::{AsmErrorKind, Nibble};
use nibble_core::isa::Mnemonic;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use crate::common::harness::FIVE_LINE_PROGRAM;

fn raw_words(source: &str) -> Vec<u16> {
    let asm = assemble(source);
    assert!(asm.is_ok(), "unexpected errors: {:?}", asm.errors);
    asm.program.iter().map(u16::from).collect()
}

#[test]
fn test_sto_packs_both_operands() {
    assert_eq!(raw_words("STO 0x4 0x5"), vec![0x045]);
}

#[test]
fn test_not_forces_second_operand_to_zero() {
    assert_eq!(raw_words("NOT 0xF"), vec![0x6F0]);
}

#[rstest]
#[case("STO 1 2", 0x012)]
#[case("ADD 1 2", 0x112)]
#[case("SUB 1 2", 0x212)]
#[case("AND 1 2", 0x312)]
#[case("OR 1 2", 0x412)]
#[case("XOR 1 2", 0x512)]
#[case("NOT 1", 0x610)]
#[case("add 0xA, 0b11", 0x1A3)]
#[case("  Xor\t15,0   ; trailing", 0x5F0)]
fn test_opcode_table(#[case] line: &str, #[case] expected: u16) {
    assert_eq!(raw_words(line), vec![expected]);
}

#[test]
fn test_comments_and_blank_lines_produce_nothing() {
    assert!(assemble("; only a comment\n\n   // another\n").program.is_empty());
    assert_eq!(strip_comment("ADD 1 2 // x ; y"), "ADD 1 2");
    assert_eq!(strip_comment("ADD 1 2 ; x // y"), "ADD 1 2");
    assert_eq!(assemble_line("   ").unwrap(), None);
}

#[test]
fn test_five_line_program_has_five_words() {
    let asm = assemble(FIVE_LINE_PROGRAM);
    assert!(asm.is_ok());
    assert_eq!(asm.program.len(), 5);
    assert_eq!(
        asm.program.hex_lines(),
        vec!["045", "146", "241", "5ab", "6f0"]
    );
}

#[test]
fn test_unknown_instruction() {
    let asm = assemble("STO 1 2\nMUL 1 2\n");
    assert_eq!(asm.errors.len(), 1);
    assert_eq!(asm.errors[0].line, 2);
    assert_eq!(
        asm.errors[0].kind,
        AsmErrorKind::UnknownInstruction {
            mnemonic: "MUL".to_string()
        }
    );
}

#[rstest]
#[case("NOT 1 2", Mnemonic::Not, 2)]
#[case("ADD 1", Mnemonic::Add, 1)]
#[case("STO", Mnemonic::Sto, 0)]
#[case("OR 1 2 3", Mnemonic::Or, 3)]
fn test_arity_mismatch(#[case] line: &str, #[case] mnemonic: Mnemonic, #[case] found: usize) {
    let err = assemble_line(line).unwrap_err();
    assert_eq!(
        err,
        AsmErrorKind::ArityMismatch {
            mnemonic,
            usage: mnemonic.usage(),
            found,
        }
    );
}

#[test]
fn test_dangling_comma_counts_as_an_empty_operand() {
    assert_eq!(
        assemble_line("ADD 1 2,").unwrap_err(),
        AsmErrorKind::ArityMismatch {
            mnemonic: Mnemonic::Add,
            usage: Mnemonic::Add.usage(),
            found: 3,
        }
    );
    assert_eq!(
        assemble_line(",NOT 1").unwrap_err(),
        AsmErrorKind::UnknownInstruction {
            mnemonic: String::new()
        }
    );
    assert_eq!(raw_words("ADD 1,, 2"), vec![0x112]);
}

#[test]
fn test_out_of_range_cites_token_and_line() {
    let asm = assemble("STO 1 2\n\nADD 0x10 1\n");
    assert_eq!(asm.errors.len(), 1);
    let err = &asm.errors[0];
    assert_eq!(err.line, 3);
    assert_eq!(err.kind.token(), Some("0x10"));
    assert!(matches!(err.kind, AsmErrorKind::ImmediateOutOfRange { .. }));
    assert!(err.to_string().starts_with("Line 3: "));
    assert!(err.message().contains("0x10"));
}

#[test]
fn test_unparsable_operand_is_number_format_error() {
    let err = assemble_line("SUB 0xG 1").unwrap_err();
    assert_eq!(
        err,
        AsmErrorKind::NumberFormatError {
            token: "0xG".to_string()
        }
    );
}

#[test]
fn test_errors_are_collected_across_lines() {
    let asm = assemble("FOO 1 2\nSTO 1 2\nNOT 1 2\nADD 99 1\nOR x 1\n");
    let lines: Vec<usize> = asm.errors.iter().map(|e| e.line).collect();
    assert_eq!(lines, vec![1, 3, 4, 5]);
    assert_eq!(asm.program.len(), 1);

    let errors = asm.into_result().unwrap_err();
    assert_eq!(errors.iter().count(), 4);
}

#[rstest]
#[case("-1")]
#[case("16")]
#[case("0b10000")]
#[case("99999999999999999999999")]
fn test_out_of_range_operands(#[case] token: &str) {
    assert_eq!(
        parse_operand(token),
        Err(AsmErrorKind::ImmediateOutOfRange {
            token: token.to_string()
        })
    );
}

#[rstest]
#[case("")]
#[case("0x")]
#[case("0b2")]
#[case("abc")]
#[case("-0x1")]
fn test_malformed_operands(#[case] token: &str) {
    assert_eq!(
        parse_operand(token),
        Err(AsmErrorKind::NumberFormatError {
            token: token.to_string()
        })
    );
}

proptest! {
    #[test]
    fn prop_every_nibble_parses_in_every_base(v in 0u8..=15) {
        let expected = Nibble::new(v).unwrap();
        for token in [
            format!("{v}"),
            format!("0x{v:x}"),
            format!("0X{v:X}"),
            format!("0b{v:b}"),
            format!("0B{v:04b}"),
        ] {
            prop_assert_eq!(parse_operand(&token), Ok(expected));
        }
    }

    #[test]
    fn prop_values_above_fifteen_are_rejected(v in 16u32..100_000) {
        for token in [format!("{v}"), format!("0x{v:x}"), format!("0b{v:b}")] {
            prop_assert_eq!(
                parse_operand(&token),
                Err(AsmErrorKind::ImmediateOutOfRange { token: token.clone() })
            );
        }
    }

    #[test]
    fn prop_encoding_layout(op in 0u8..6, a in 0u8..=15, b in 0u8..=15) {
        let m = Mnemonic::from_opcode(op).unwrap();
        let line = format!("{m} {a} {b}");
        let words = raw_words(&line);
        prop_assert_eq!(words, vec![(u16::from(op) << 8) | (u16::from(a) << 4) | u16::from(b)]);
    }
}
