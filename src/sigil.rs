//! Single-codepoint sigils for lexicon entries.
//!
//! Each accepted entry at position `i` of the source list gets the sigil `base + i`, normally in
//! the Private Use Area. Skipped entries leave a gap rather than shifting later sigils, so an
//! entry's sigil depends only on its position in the source.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{
    de::{self, Deserializer, Visitor},
    ser::Serializer,
    Deserialize, Serialize,
};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Version tag written into serialized sigil lexicons.
pub const SCHEMA_VERSION: &str = "1.0.0";
/// Default first sigil codepoint: the start of the Private Use Area.
pub const DEFAULT_BASE_CODEPOINT: u32 = 0xE000;
/// Default number of reserved sigil codepoints (U+E000..U+F8FF).
pub const DEFAULT_CAPACITY: usize = 6400;

/// A Unicode codepoint value, written as `U+XXXX`.
///
/// Parsing accepts `U+E000`, `0xE000`, bare hex `E000`, or decimal `57344`. A string of only
/// decimal digits is always read as decimal, so `"57344"` is U+E000 and never U+57344. Hex
/// values made only of digits need a `U+` or `0x` prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Codepoint(pub u32);

impl Codepoint {
    pub fn value(self) -> u32 {
        self.0
    }

    /// The codepoint as a `char`, if it is a Unicode scalar value.
    pub fn to_char(self) -> Option<char> {
        char::from_u32(self.0)
    }
}

impl Default for Codepoint {
    fn default() -> Self {
        Codepoint(DEFAULT_BASE_CODEPOINT)
    }
}

impl From<char> for Codepoint {
    fn from(c: char) -> Self {
        Codepoint(c as u32)
    }
}

impl fmt::Display for Codepoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "U+{:04X}", self.0)
    }
}

impl FromStr for Codepoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let t = s.trim();
        let hex = t
            .strip_prefix("U+")
            .or_else(|| t.strip_prefix("u+"))
            .or_else(|| t.strip_prefix("0x"))
            .or_else(|| t.strip_prefix("0X"));
        let parsed = match hex {
            Some(h) => u32::from_str_radix(h, 16),
            None if !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit()) => t.parse::<u32>(),
            None => u32::from_str_radix(t, 16),
        };
        parsed
            .map(Codepoint)
            .map_err(|_| Error::ParseCodepoint(s.to_owned()))
    }
}

impl Serialize for Codepoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Codepoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CodepointVisitor;
        impl<'de> Visitor<'de> for CodepointVisitor {
            type Value = Codepoint;

            fn expecting(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
                write!(fmt, "a codepoint string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                u32::try_from(v)
                    .map(Codepoint)
                    .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
            }
        }

        deserializer.deserialize_any(CodepointVisitor)
    }
}

/// Where sigils start and how many may be handed out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigilConfig {
    pub base_codepoint: Codepoint,
    pub capacity: usize,
}

impl Default for SigilConfig {
    fn default() -> Self {
        Self {
            base_codepoint: Codepoint(DEFAULT_BASE_CODEPOINT),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// One input to sigil assignment. Integrity fields left out are filled in from the glyphs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SigilSource {
    pub word: String,
    #[serde(default)]
    pub definition: String,
    pub glyphs: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyph_checksum: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_checksum: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyph_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entropy_estimate: Option<f64>,
}

/// A lexicon entry bound to its sigil.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SigilEntry {
    pub word: String,
    pub definition: String,
    pub glyphs: String,
    pub glyph_checksum: u32,
    pub byte_checksum: u32,
    pub glyph_length: usize,
    pub entropy_estimate: f64,
    pub sigil: char,
    pub codepoint: Codepoint,
    /// Position of the entry in the source list.
    pub index: usize,
}

/// Serialized form of a [`SigilLexicon`].
#[derive(Deserialize)]
struct LexiconFile {
    #[serde(default)]
    schema_version: String,
    #[serde(default)]
    base_codepoint: Codepoint,
    #[serde(default)]
    entries: Vec<SigilEntry>,
}

/// An assigned set of sigils with lookup in both directions.
///
/// Lookups return the first entry in list order when a word or sigil repeats.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LexiconFile")]
pub struct SigilLexicon {
    schema_version: String,
    base_codepoint: Codepoint,
    entries: Vec<SigilEntry>,
    #[serde(skip)]
    by_word: HashMap<String, usize>,
    #[serde(skip)]
    by_sigil: HashMap<char, usize>,
}

impl TryFrom<LexiconFile> for SigilLexicon {
    type Error = Error;

    fn try_from(file: LexiconFile) -> Result<Self> {
        let mut seen: HashMap<char, &str> = HashMap::new();
        for e in file.entries.iter() {
            if let Some(first) = seen.insert(e.sigil, &e.word) {
                return Err(Error::Collision {
                    index: e.index,
                    codepoint: Codepoint::from(e.sigil).to_string(),
                    first: first.to_owned(),
                    second: e.word.clone(),
                });
            }
        }
        let mut lexicon = Self::with_entries(file.base_codepoint, file.entries);
        if !file.schema_version.is_empty() {
            lexicon.schema_version = file.schema_version;
        }
        Ok(lexicon)
    }
}

impl SigilLexicon {
    fn with_entries(base_codepoint: Codepoint, entries: Vec<SigilEntry>) -> Self {
        let mut by_word = HashMap::with_capacity(entries.len());
        let mut by_sigil = HashMap::with_capacity(entries.len());
        for (i, e) in entries.iter().enumerate() {
            by_word.entry(e.word.clone()).or_insert(i);
            by_sigil.entry(e.sigil).or_insert(i);
        }
        Self {
            schema_version: SCHEMA_VERSION.to_owned(),
            base_codepoint,
            entries,
            by_word,
            by_sigil,
        }
    }

    /// Assign a sigil to every well-formed source entry.
    ///
    /// Fails outright if there are more sources than `config.capacity`, if any computed
    /// codepoint isn't a valid `char`, or if two entries land on the same sigil. Entries with a
    /// blank word or no glyphs are skipped, and their index stays unused.
    pub fn assign(sources: &[SigilSource], config: &SigilConfig) -> Result<Self> {
        if sources.len() > config.capacity {
            return Err(Error::Capacity {
                entries: sources.len(),
                capacity: config.capacity,
            });
        }
        let base = config.base_codepoint.value();
        let mut entries = Vec::with_capacity(sources.len());
        let mut used: HashSet<char> = HashSet::with_capacity(sources.len());
        for (index, src) in sources.iter().enumerate() {
            let word = src.word.trim();
            if word.is_empty() || src.glyphs.is_empty() {
                warn!(index, word = %src.word, "skipping malformed lexicon entry");
                continue;
            }
            let raw = base as u64 + index as u64;
            let sigil = u32::try_from(raw)
                .ok()
                .and_then(char::from_u32)
                .ok_or(Error::InvalidCodepoint(raw.min(u32::MAX as u64) as u32))?;
            if !used.insert(sigil) {
                let first = entries
                    .iter()
                    .find(|e: &&SigilEntry| e.sigil == sigil)
                    .map(|e| e.word.clone())
                    .unwrap_or_default();
                return Err(Error::Collision {
                    index,
                    codepoint: Codepoint::from(sigil).to_string(),
                    first,
                    second: word.to_owned(),
                });
            }
            let glyph_crc = crc32fast::hash(src.glyphs.as_bytes());
            entries.push(SigilEntry {
                word: word.to_owned(),
                definition: src.definition.trim().to_owned(),
                glyphs: src.glyphs.clone(),
                glyph_checksum: src.glyph_checksum.unwrap_or(glyph_crc),
                byte_checksum: src.byte_checksum.unwrap_or(glyph_crc),
                glyph_length: src.glyph_length.unwrap_or_else(|| src.glyphs.chars().count()),
                entropy_estimate: src.entropy_estimate.unwrap_or(0.0),
                sigil,
                codepoint: Codepoint::from(sigil),
                index,
            });
        }
        debug!(
            sources = sources.len(),
            assigned = entries.len(),
            base = %config.base_codepoint,
            "assigned sigils"
        );
        Ok(Self::with_entries(config.base_codepoint, entries))
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    pub fn base_codepoint(&self) -> Codepoint {
        self.base_codepoint
    }

    pub fn entries(&self) -> &[SigilEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup_by_word(&self, word: &str) -> Option<&SigilEntry> {
        self.by_word.get(word).map(|&i| &self.entries[i])
    }

    pub fn lookup_by_sigil(&self, sigil: char) -> Option<&SigilEntry> {
        self.by_sigil.get(&sigil).map(|&i| &self.entries[i])
    }

    /// Translate whitespace-separated words into a sigil string. Words without an entry are
    /// left out of the result and returned separately, in order.
    pub fn text_to_sigils(&self, text: &str) -> (String, Vec<String>) {
        let mut sigils = String::new();
        let mut missing = Vec::new();
        for word in text.split_whitespace() {
            match self.lookup_by_word(word) {
                Some(e) => sigils.push(e.sigil),
                None => missing.push(word.to_owned()),
            }
        }
        (sigils, missing)
    }

    /// Translate a sigil string back into space-separated words. Every character without an
    /// entry is returned separately, in order.
    pub fn sigils_to_text(&self, sigils: &str) -> (String, Vec<char>) {
        let mut words: Vec<&str> = Vec::new();
        let mut missing = Vec::new();
        for c in sigils.chars() {
            match self.lookup_by_sigil(c) {
                Some(e) => words.push(&e.word),
                None => missing.push(c),
            }
        }
        (words.join(" "), missing)
    }
}
