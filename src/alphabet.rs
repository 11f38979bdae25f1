//! Ordered, duplicate-free symbol sets.
//!
//! An [`Alphabet`] is a bijection between symbols and the indices `0..base`. Every codec and
//! every piece of glyph algebra is defined over exactly one alphabet, and two glyphstrings are
//! only comparable when they were produced under the same one. Changing the alphabet, even by
//! reordering it, invalidates everything that was encoded with it.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// The smallest alphabet that can carry every byte as an ordered pair of indices.
pub const MIN_ALPHABET_SIZE: usize = 16;

/// The canonical 111-glyph alphabet used by the glyph algebra.
pub const GLYPHMATICS: [char; 111] = [
    '✶', '✷', '✸', '✹', '✺', '✻', '✼', '✽', '✾', '✿', //
    '❀', '❁', '❂', '❃', '❄', '❅', '❆', '❇', '❈', '❉', //
    '❊', '❋', '❖', '❘', '❙', '❚', '❛', '❜', '❝', '❞', //
    '❡', '❢', '❣', '❤', '❥', '❦', '❧', '⟡', '⟢', '⟣', //
    '⟤', '⟥', '⟦', '⟧', '⟨', '⟩', '⟪', '⟫', '⟬', '⟭', //
    '⟮', '⟯', '⧈', '⧉', '⧊', '⧋', '⧌', '⧍', '⧎', '⧏', //
    '⬒', '⬓', '⬔', '⬕', '⬖', '⬗', '⬘', '⬙', '⬚', '⬛', //
    '⬜', '⬝', '⬞', '⬟', '★', '☆', '✦', '✧', '✩', '✪', //
    '✫', '✬', '✭', '✮', '✯', '✰', '☀', '☁', '☂', '☃', //
    '☄', '☇', '☈', '☉', '☊', '☋', '☌', '☍', '☗', '☖', //
    '♠', '♣', '♥', '♦', '♤', '♧', '♡', '♢', '⚗', '⊏', //
    '⊐',
];

#[derive(Clone, Debug)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: HashMap<char, usize>,
}

impl Alphabet {
    /// Build an alphabet from an ordered list of symbols. Fails on duplicates, or if there are
    /// fewer than [`MIN_ALPHABET_SIZE`] symbols.
    pub fn new<I: IntoIterator<Item = char>>(symbols: I) -> Result<Self> {
        let symbols: Vec<char> = symbols.into_iter().collect();
        if symbols.len() < MIN_ALPHABET_SIZE {
            return Err(Error::InvalidAlphabet(format!(
                "alphabet length must be >= {}, got {}",
                MIN_ALPHABET_SIZE,
                symbols.len()
            )));
        }
        if symbols.len() > u16::MAX as usize {
            return Err(Error::InvalidAlphabet(format!(
                "alphabet length must be <= {}, got {}",
                u16::MAX,
                symbols.len()
            )));
        }
        let mut index = HashMap::with_capacity(symbols.len());
        for (i, &c) in symbols.iter().enumerate() {
            if let Some(prev) = index.insert(c, i) {
                return Err(Error::InvalidAlphabet(format!(
                    "symbol {:?} appears at both {} and {}",
                    c, prev, i
                )));
            }
        }
        Ok(Self { symbols, index })
    }

    /// Build an alphabet from string symbols, as found in an alphabet file. Each string must be
    /// exactly one character.
    pub fn from_strings<S: AsRef<str>>(symbols: &[S]) -> Result<Self> {
        let mut chars = Vec::with_capacity(symbols.len());
        for (i, s) in symbols.iter().enumerate() {
            let s = s.as_ref();
            let mut iter = s.chars();
            match (iter.next(), iter.next()) {
                (Some(c), None) => chars.push(c),
                _ => {
                    return Err(Error::InvalidAlphabet(format!(
                        "symbol {} ({:?}) must be exactly one character",
                        i, s
                    )))
                }
            }
        }
        Self::new(chars)
    }

    /// Parse an alphabet from a JSON list of single-character strings.
    pub fn from_json(json: &str) -> Result<Self> {
        let symbols: Vec<String> = serde_json::from_str(json)?;
        Self::from_strings(&symbols)
    }

    /// The fixed 111-glyph alphabet.
    pub fn glyphmatics() -> Self {
        // GLYPHMATICS is unique and larger than the minimum; checked in tests.
        let index = GLYPHMATICS.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self {
            symbols: GLYPHMATICS.to_vec(),
            index,
        }
    }

    /// Number of symbols in the alphabet.
    pub fn base(&self) -> usize {
        self.symbols.len()
    }

    pub fn index_of(&self, symbol: char) -> Option<usize> {
        self.index.get(&symbol).copied()
    }

    /// Get the symbol at `index`. Panics if out of range, as indices always come from this
    /// alphabet's own arithmetic.
    pub fn symbol_of(&self, index: usize) -> char {
        self.symbols[index]
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.index.contains_key(&symbol)
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Serialize the alphabet as a JSON list of strings, the inverse of [`Alphabet::from_json`].
    pub fn to_json(&self) -> String {
        let list: Vec<String> = self.symbols.iter().map(|c| c.to_string()).collect();
        serde_json::to_string(&list).unwrap_or_default()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::glyphmatics()
    }
}

impl PartialEq for Alphabet {
    fn eq(&self, other: &Self) -> bool {
        self.symbols == other.symbols
    }
}

impl Eq for Alphabet {}
