//! Assembled program container.

use serde::Serialize;

use crate::isa::Word;

/// An ordered, immutable sequence of words. Index is address; order is execution order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Program {
    words: Vec<Word>,
}

impl Program {
    /// Wraps already-encoded words.
    pub const fn from_words(words: Vec<Word>) -> Self {
        Self { words }
    }

    /// Number of instructions.
    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if the program has no instructions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Word at `address`, if in range.
    pub fn get(&self, address: usize) -> Option<Word> {
        self.words.get(address).copied()
    }

    /// All words in address order.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Iterates over the words in address order.
    pub fn iter(&self) -> impl Iterator<Item = Word> + '_ {
        self.words.iter().copied()
    }

    /// Three-digit hex text of every word, in address order.
    pub fn hex_lines(&self) -> Vec<String> {
        self.iter().map(Word::to_hex).collect()
    }
}
