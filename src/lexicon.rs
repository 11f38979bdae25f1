//! Word/definition lexicons.
//!
//! Source text comes in one of two layouts. Block mode is used when any line starts with
//! `"### "`:
//!
//! ```text
//! ### entropy
//! A measure of disorder
//! in a system.
//! ```
//!
//! Otherwise each line is read as `word: definition`, skipping blank lines and `#` comments.
//! Every definition is then encoded through [`Codec::inner_dialog`] and fingerprinted.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::Codec;
use crate::error::Result;
use crate::sigil::SigilSource;

/// Version tag written into serialized word/definition lexicons.
pub const SCHEMA_VERSION: &str = "1.0.0";

const BLOCK_HEADER: &str = "### ";

/// One encoded word/definition pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordDefEntry {
    pub word: String,
    pub definition: String,
    pub glyphs: String,
    pub glyph_checksum: u32,
    pub byte_checksum: u32,
    pub length: usize,
    pub entropy_estimate: f64,
}

impl From<&WordDefEntry> for SigilSource {
    fn from(e: &WordDefEntry) -> Self {
        SigilSource {
            word: e.word.clone(),
            definition: e.definition.clone(),
            glyphs: e.glyphs.clone(),
            glyph_checksum: Some(e.glyph_checksum),
            byte_checksum: Some(e.byte_checksum),
            glyph_length: Some(e.length),
            entropy_estimate: Some(e.entropy_estimate),
        }
    }
}

/// Split word/definition source text into `(word, definition)` pairs, picking the layout
/// automatically.
pub fn parse_worddefs(text: &str) -> Vec<(String, String)> {
    if text.lines().any(|l| l.starts_with(BLOCK_HEADER)) {
        parse_blocks(text)
    } else {
        parse_lines(text)
    }
}

fn parse_blocks(text: &str) -> Vec<(String, String)> {
    fn flush(word: Option<&str>, body: &[&str], out: &mut Vec<(String, String)>) {
        let word = match word {
            Some(w) if !w.is_empty() => w,
            _ => return,
        };
        let joined = body
            .iter()
            .map(|l| l.trim_end())
            .collect::<Vec<_>>()
            .join("\n");
        let definition = joined.trim();
        if !definition.is_empty() {
            out.push((word.to_owned(), definition.to_owned()));
        }
    }

    let mut out = Vec::new();
    let mut word: Option<&str> = None;
    let mut body: Vec<&str> = Vec::new();
    for line in text.lines() {
        if let Some(header) = line.strip_prefix(BLOCK_HEADER) {
            flush(word, &body, &mut out);
            word = Some(header.trim());
            body.clear();
        } else if word.is_some() {
            body.push(line);
        }
    }
    flush(word, &body, &mut out);
    out
}

fn parse_lines(text: &str) -> Vec<(String, String)> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(|l| l.split_once(':'))
        .map(|(w, d)| (w.trim(), d.trim()))
        .filter(|(w, d)| !w.is_empty() && !d.is_empty())
        .map(|(w, d)| (w.to_owned(), d.to_owned()))
        .collect()
}

/// Encode definitions into glyph entries. Definitions are trimmed, and any shorter than
/// `min_length` characters are dropped.
pub fn encode_entries<W, D>(
    codec: &Codec,
    pairs: &[(W, D)],
    channel_key: Option<&str>,
    min_length: usize,
) -> Vec<WordDefEntry>
where
    W: AsRef<str>,
    D: AsRef<str>,
{
    let entries: Vec<WordDefEntry> = pairs
        .iter()
        .filter_map(|(word, definition)| {
            let definition = definition.as_ref().trim();
            if definition.chars().count() < min_length {
                return None;
            }
            let glyphs = codec.inner_dialog(definition, channel_key);
            let fp = codec.fingerprint(&glyphs);
            Some(WordDefEntry {
                word: word.as_ref().to_owned(),
                definition: definition.to_owned(),
                glyphs,
                glyph_checksum: fp.glyph_checksum,
                byte_checksum: fp.byte_checksum,
                length: fp.length,
                entropy_estimate: fp.entropy_estimate,
            })
        })
        .collect();
    debug!(
        pairs = pairs.len(),
        entries = entries.len(),
        keyed = channel_key.is_some(),
        "encoded word/definition entries"
    );
    entries
}

/// An encoded word/definition lexicon, along with the channel key its glyphs were mixed with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordDefLexicon {
    pub schema_version: String,
    pub channel_key: Option<String>,
    pub entries: Vec<WordDefEntry>,
}

impl WordDefLexicon {
    /// Parse source text and encode every definition.
    pub fn build(codec: &Codec, text: &str, channel_key: Option<&str>, min_length: usize) -> Self {
        let pairs = parse_worddefs(text);
        Self {
            schema_version: SCHEMA_VERSION.to_owned(),
            channel_key: channel_key.map(str::to_owned),
            entries: encode_entries(codec, &pairs, channel_key, min_length),
        }
    }

    /// First entry for `word`.
    pub fn entry(&self, word: &str) -> Option<&WordDefEntry> {
        self.entries.iter().find(|e| e.word == word)
    }

    /// Recover the definition text from an entry's glyphs using this lexicon's channel key.
    pub fn decode_entry(&self, codec: &Codec, entry: &WordDefEntry) -> Result<String> {
        codec.inner_dialog_decode(&entry.glyphs, self.channel_key.as_deref())
    }

    /// Inputs for sigil assignment, in entry order.
    pub fn sigil_sources(&self) -> Vec<SigilSource> {
        self.entries.iter().map(SigilSource::from).collect()
    }
}
