//! 4-bit value type.
//!
//! Operands, RAM addresses, RAM contents, and the accumulator all share the same
//! `[0, 15]` range. `Nibble` enforces that range at construction so the rest of the
//! crate never re-validates it.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::constants::NIBBLE_MAX;

/// A 4-bit unsigned value in `[0, 15]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Nibble(u8);

impl Nibble {
    /// The zero nibble.
    pub const ZERO: Self = Self(0);

    /// The largest nibble, `0xF`.
    pub const MAX: Self = Self(NIBBLE_MAX);

    /// Creates a nibble, returning `None` if `value` exceeds `0xF`.
    #[inline]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= NIBBLE_MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Creates a nibble from the low four bits of `value`, discarding the rest.
    #[inline]
    pub const fn truncate(value: u16) -> Self {
        Self((value & NIBBLE_MAX as u16) as u8)
    }

    /// Returns the raw value.
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns the value widened to `usize`, for indexing RAM.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Parses a single hexadecimal nibble such as `"a"` or `"F"`.
    ///
    /// Leading zeros are accepted (`"0F"`), anything above `0xF` is rejected.
    pub fn from_hex(text: &str) -> Option<Self> {
        u8::from_str_radix(text.trim(), 16).ok().and_then(Self::new)
    }
}

impl TryFrom<u8> for Nibble {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(value)
    }
}

impl From<Nibble> for u8 {
    fn from(n: Nibble) -> Self {
        n.0
    }
}

impl fmt::Display for Nibble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

impl fmt::LowerHex for Nibble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for Nibble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}
