//! glyph-pack is a reversible, text-safe encoding for structured semantic records. Records are
//! packed into checksummed binary frames, and the frames are armored into printable characters
//! that survive plain-text storage. Alongside this, glyph-pack provides a symbolic algebra over
//! the encoded glyphstrings that never needs to decode them back to bytes.
//!
//! It is made up of:
//!
//! - An [`Alphabet`] of at least 16 symbols, and a [`Codec`] over it that maps each byte to a pair
//! 	of symbols.
//! - Glyph algebra on the codec: normalization, concatenation, modular addition and
//! 	subtraction, inversion, and a positional distance.
//! - Integrity [`Fingerprint`]s of glyphstrings, and reversible inner-dialog mixing with an
//! 	optional channel key. Mixing is obfuscation, not encryption.
//! - Two container frames, the [leaf](Leaf) and the [page](Page). Each is zstd-compressed and
//! 	followed by a CRC-32 of the compressed bytes. A page carries a sealed leaf, giving two
//! 	independent integrity layers.
//! - An [armor](armor) transform mapping frame bytes into the Braille Patterns block, and a
//! 	single-line armored form with a title.
//! - [`Superparagraph`] records, which run through all of the above: record, leaf, page, line.
//! - Word/definition [lexicons](lexicon), and a [`SigilLexicon`] binding each entry to one
//! 	Private Use Area codepoint.
//!
//! Alphabets, codecs, and framers are immutable once built, and are set up explicitly, either
//! directly or from a [`Config`].
//!
//! # Example
//!
//! ```
//! use glyph_pack::{decode_superparagraph, encode_superparagraph, Codec, Superparagraph};
//!
//! let codec = Codec::glyphmatics();
//! let record = Superparagraph {
//!     word: "entropy".into(),
//!     definition: "A measure of disorder.".into(),
//!     glyphs: codec.inner_dialog("A measure of disorder.", None),
//!     ..Default::default()
//! };
//! let line = encode_superparagraph(&record, "entropy").unwrap();
//! assert_eq!(decode_superparagraph(&line).unwrap(), record);
//! ```

mod algebra;
mod alphabet;
mod codec;
mod compress;
mod error;
mod fingerprint;
mod frame;
mod mixing;

pub mod armor;
pub mod config;
pub mod envelope;
pub mod lexicon;
pub mod sigil;
pub mod superparagraph;

pub use self::alphabet::{Alphabet, GLYPHMATICS, MIN_ALPHABET_SIZE};
pub use self::armor::{armor_line, from_armor, to_armor, unarmor_line};
pub use self::codec::Codec;
pub use self::compress::{CompressionError, DEFAULT_LEVEL};
pub use self::config::Config;
pub use self::error::{Error, Layer, Result};
pub use self::fingerprint::{entropy_estimate, Fingerprint};
pub use self::frame::{
    decode_leaf, decode_page, encode_leaf, encode_page, Block, BlockKind, Framer, Leaf, Metadata,
    Page, DEFAULT_MAX_FRAME_SIZE, LEAF_VERSION, MAGIC, MAX_NAME_LEN, PAGE_SCHEME, PAGE_VERSION,
};
pub use self::lexicon::{encode_entries, parse_worddefs, WordDefEntry, WordDefLexicon};
pub use self::sigil::{Codepoint, SigilConfig, SigilEntry, SigilLexicon, SigilSource};
pub use self::superparagraph::{decode_superparagraph, encode_superparagraph, Superparagraph};
