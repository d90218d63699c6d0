//! Operand (immediate) parsing.
//!
//! Operands are strict 4-bit values written in one of three bases:
//! `0x`-prefixed hexadecimal, `0b`-prefixed binary, or bare decimal. Prefixes are
//! case-insensitive. A bare decimal may carry a sign, so `-1` is reported as out of
//! range rather than as garbage.

use crate::common::{AsmErrorKind, NIBBLE_MAX, Nibble};

/// Parses one operand token into a nibble.
///
/// # Errors
///
/// * [`AsmErrorKind::NumberFormatError`] if the token is not a number in its base.
/// * [`AsmErrorKind::ImmediateOutOfRange`] if it is a number outside `[0, 15]`.
pub fn parse_operand(token: &str) -> Result<Nibble, AsmErrorKind> {
    let lower = token.trim().to_ascii_lowercase();
    let (digits, radix) = if let Some(rest) = lower.strip_prefix("0x") {
        (rest, 16)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (rest, 2)
    } else {
        (lower.as_str(), 10)
    };

    let (negative, magnitude) = match digits.as_bytes().first() {
        Some(b'-') if radix == 10 => (true, &digits[1..]),
        Some(b'+') if radix == 10 => (false, &digits[1..]),
        _ => (false, digits),
    };

    if magnitude.is_empty() || !magnitude.chars().all(|c| c.is_digit(radix)) {
        return Err(AsmErrorKind::NumberFormatError {
            token: token.to_string(),
        });
    }

    // Every digit is valid for the radix, so the only possible failure is overflow.
    let in_range = u64::from_str_radix(magnitude, radix)
        .ok()
        .filter(|v| *v <= u64::from(NIBBLE_MAX) && (!negative || *v == 0));

    in_range
        .and_then(|v| Nibble::new(v as u8))
        .ok_or_else(|| AsmErrorKind::ImmediateOutOfRange {
            token: token.to_string(),
        })
}
