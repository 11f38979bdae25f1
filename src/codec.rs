//! The two-symbols-per-byte codec.
//!
//! Each byte `b` becomes the symbol pair `(b / base, b % base)`. Since every [`Alphabet`] has at
//! least 16 symbols, both halves always fit. The reverse direction is not total: for any base
//! above 16 there are pairs whose code `hi * base + lo` lands past 255, and those are rejected.

use crate::alphabet::Alphabet;
use crate::error::{Error, Result};

/// An alphabet together with the byte codec and glyph algebra defined over it.
///
/// A `Codec` is immutable once built and can be shared freely between threads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Codec {
    alphabet: Alphabet,
}

impl Codec {
    pub fn new(alphabet: Alphabet) -> Self {
        Self { alphabet }
    }

    /// A codec over the fixed 111-glyph alphabet.
    pub fn glyphmatics() -> Self {
        Self::new(Alphabet::glyphmatics())
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn base(&self) -> usize {
        self.alphabet.base()
    }

    /// Indices of every alphabet member in `s`, in order. Non-members are dropped.
    pub(crate) fn indices(&self, s: &str) -> Vec<usize> {
        s.chars().filter_map(|c| self.alphabet.index_of(c)).collect()
    }

    pub(crate) fn from_indices<I: IntoIterator<Item = usize>>(&self, indices: I) -> String {
        indices
            .into_iter()
            .map(|i| self.alphabet.symbol_of(i))
            .collect()
    }

    fn byte_to_pair(&self, b: u8) -> (usize, usize) {
        let base = self.base();
        (b as usize / base, b as usize % base)
    }

    fn pair_to_byte(&self, hi: usize, lo: usize) -> Result<u8> {
        let code = hi * self.base() + lo;
        u8::try_from(code).map_err(|_| Error::InvalidPair { hi, lo, code })
    }

    /// Encode bytes as glyphs, two symbols per byte.
    pub fn byte_to_glyphs(&self, data: &[u8]) -> String {
        let mut out = String::with_capacity(data.len() * 8);
        for &b in data {
            let (hi, lo) = self.byte_to_pair(b);
            out.push(self.alphabet.symbol_of(hi));
            out.push(self.alphabet.symbol_of(lo));
        }
        out
    }

    /// Decode a glyphstring back into bytes. The input is normalized first, so characters outside
    /// the alphabet (whitespace, delimiters) are ignored.
    pub fn glyphs_to_bytes(&self, s: &str) -> Result<Vec<u8>> {
        self.indices_to_bytes(&self.indices(s))
    }

    /// Decode a glyphstring back into bytes without normalizing: any character outside the
    /// alphabet is an error.
    pub fn glyphs_to_bytes_strict(&self, s: &str) -> Result<Vec<u8>> {
        let indices = s
            .chars()
            .map(|c| self.alphabet.index_of(c).ok_or(Error::UnknownSymbol(c)))
            .collect::<Result<Vec<usize>>>()?;
        self.indices_to_bytes(&indices)
    }

    fn indices_to_bytes(&self, indices: &[usize]) -> Result<Vec<u8>> {
        if indices.len() % 2 != 0 {
            return Err(Error::OddLength(indices.len()));
        }
        indices
            .chunks_exact(2)
            .map(|pair| self.pair_to_byte(pair[0], pair[1]))
            .collect()
    }

    /// Encode text as its UTF-8 bytes.
    pub fn text_to_glyphs(&self, text: &str) -> String {
        self.byte_to_glyphs(text.as_bytes())
    }

    /// Decode glyphs to bytes, then require those bytes to be UTF-8.
    pub fn glyphs_to_text(&self, s: &str) -> Result<String> {
        Ok(String::from_utf8(self.glyphs_to_bytes(s)?)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::Rng;

    fn hex_codec() -> Codec {
        Codec::new(Alphabet::new("0123456789abcdef".chars()).unwrap())
    }

    #[test]
    fn every_byte() {
        for codec in [Codec::glyphmatics(), hex_codec()] {
            let all: Vec<u8> = (0..=255).collect();
            let glyphs = codec.byte_to_glyphs(&all);
            assert_eq!(glyphs.chars().count(), 512);
            assert_eq!(codec.glyphs_to_bytes(&glyphs).unwrap(), all);
        }
    }

    #[test]
    fn random_roundtrip() {
        let codec = Codec::glyphmatics();
        let mut rng = rand::thread_rng();
        for len in 0..64 {
            let data: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            let glyphs = codec.byte_to_glyphs(&data);
            assert_eq!(glyphs.chars().count(), 2 * len);
            assert_eq!(codec.glyphs_to_bytes(&glyphs).unwrap(), data);
            assert_eq!(codec.glyphs_to_bytes_strict(&glyphs).unwrap(), data);
        }
    }

    #[test]
    fn hex_alphabet() {
        // With 16 symbols the codec is plain hexadecimal.
        let codec = hex_codec();
        assert_eq!(codec.byte_to_glyphs(&[0x00, 0x7f, 0xff]), "007fff");
    }

    #[test]
    fn glyphmatics_alphabet() {
        // 255 = 2 * 111 + 33
        let codec = Codec::glyphmatics();
        let glyphs = codec.byte_to_glyphs(&[255]);
        let expected: String = [codec.alphabet().symbol_of(2), codec.alphabet().symbol_of(33)]
            .iter()
            .collect();
        assert_eq!(glyphs, expected);
    }

    #[test]
    fn odd_length() {
        let codec = Codec::glyphmatics();
        let glyphs = codec.byte_to_glyphs(b"ab");
        let truncated: String = glyphs.chars().take(3).collect();
        match codec.glyphs_to_bytes(&truncated).unwrap_err() {
            Error::OddLength(3) => (),
            e => panic!("expected OddLength, got {:?}", e),
        }
    }

    #[test]
    fn invalid_pair() {
        // (2, 34) = 256, one past the byte range.
        let codec = Codec::glyphmatics();
        let glyphs = codec.from_indices([2, 34]);
        match codec.glyphs_to_bytes(&glyphs).unwrap_err() {
            Error::InvalidPair { hi: 2, lo: 34, code: 256 } => (),
            e => panic!("expected InvalidPair, got {:?}", e),
        }
        // And (2, 33) is the last valid pair.
        let glyphs = codec.from_indices([2, 33]);
        assert_eq!(codec.glyphs_to_bytes(&glyphs).unwrap(), vec![255]);
    }

    #[test]
    fn normalizing_vs_strict() {
        let codec = Codec::glyphmatics();
        let glyphs = codec.byte_to_glyphs(b"hi");
        let noisy: String = glyphs.chars().flat_map(|c| [c, ' ']).collect();
        assert_eq!(codec.glyphs_to_bytes(&noisy).unwrap(), b"hi");
        match codec.glyphs_to_bytes_strict(&noisy).unwrap_err() {
            Error::UnknownSymbol(' ') => (),
            e => panic!("expected UnknownSymbol, got {:?}", e),
        }
    }

    #[test]
    fn text_roundtrip() {
        let codec = Codec::glyphmatics();
        for text in ["", "SigilAGI / GlyphNotes Canonical Test", "ΩϞ entropy ✶ 熵"] {
            let glyphs = codec.text_to_glyphs(text);
            assert_eq!(codec.glyphs_to_text(&glyphs).unwrap(), text);
        }
    }

    #[test]
    fn bad_utf8() {
        let codec = Codec::glyphmatics();
        let glyphs = codec.byte_to_glyphs(&[0xff, 0xfe]);
        assert!(matches!(
            codec.glyphs_to_text(&glyphs).unwrap_err(),
            Error::Encoding(_)
        ));
    }
}
