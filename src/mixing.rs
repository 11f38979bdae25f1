//! Inner-dialog mixing.
//!
//! Text is encoded through the codec and, when a channel key is given, combined with the encoded
//! key by modular addition. Decoding subtracts the same key. This is obfuscation, not encryption:
//! the modulus is tiny, the key is simply repeated, and anyone holding a few known plaintext
//! bytes can recover it.

use crate::codec::Codec;
use crate::error::Result;

impl Codec {
    /// The encoded key, cycled or cut to exactly `len` glyphs. A key longer than the text would
    /// otherwise stretch the mixed output past the text's own length.
    fn channel(&self, key: &str, len: usize) -> String {
        let key = self.indices(&self.text_to_glyphs(key));
        self.from_indices(key.iter().copied().cycle().take(len))
    }

    /// Encode `text` as glyphs, optionally mixed with `key`. An empty key is the same as no key.
    /// The output always has the same length as the unmixed encoding.
    pub fn inner_dialog(&self, text: &str, key: Option<&str>) -> String {
        let base = self.text_to_glyphs(text);
        match key.filter(|k| !k.is_empty()) {
            Some(key) => {
                let len = self.glyph_len(&base);
                self.add(&base, &self.channel(key, len))
            }
            None => base,
        }
    }

    /// Reverse [`Codec::inner_dialog`] with the same key.
    pub fn inner_dialog_decode(&self, glyphs: &str, key: Option<&str>) -> Result<String> {
        let normalized = self.normalize(glyphs);
        match key.filter(|k| !k.is_empty()) {
            Some(key) => {
                let len = self.glyph_len(&normalized);
                self.glyphs_to_text(&self.sub(&normalized, &self.channel(key, len)))
            }
            None => self.glyphs_to_text(&normalized),
        }
    }
}
