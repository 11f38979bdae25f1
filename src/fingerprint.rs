use serde::{Deserialize, Serialize};

use crate::codec::Codec;

/// Compact integrity summary of a glyphstring.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fingerprint {
    /// CRC-32 over the UTF-8 bytes of the normalized glyphstring.
    pub glyph_checksum: u32,
    /// CRC-32 over the decoded bytes, or 0 if the glyphstring doesn't decode.
    pub byte_checksum: u32,
    /// Glyph length after normalization.
    pub length: usize,
    /// Shannon entropy of the decoded bytes in bits per byte (0 to 8), or 0 if it doesn't decode.
    pub entropy_estimate: f64,
}

/// Shannon entropy estimate of a byte string, in bits per byte.
pub fn entropy_estimate(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut freq = [0usize; 256];
    for &b in data {
        freq[b as usize] += 1;
    }
    let n = data.len() as f64;
    freq.iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / n;
            -p * p.log2()
        })
        .sum()
}

impl Codec {
    /// CRC-32 over the UTF-8 bytes of the normalized glyphstring.
    pub fn glyph_checksum(&self, s: &str) -> u32 {
        crc32fast::hash(self.normalize(s).as_bytes())
    }

    /// Fingerprint a glyphstring. Never fails: glyphstrings that aren't valid codec output get
    /// zeroed byte-level fields.
    pub fn fingerprint(&self, s: &str) -> Fingerprint {
        let normalized = self.normalize(s);
        let (byte_checksum, entropy) = self
            .glyphs_to_bytes(&normalized)
            .map(|data| (crc32fast::hash(&data), entropy_estimate(&data)))
            .unwrap_or((0, 0.0));
        Fingerprint {
            glyph_checksum: crc32fast::hash(normalized.as_bytes()),
            byte_checksum,
            length: normalized.chars().count(),
            entropy_estimate: entropy,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn entropy() {
        assert_eq!(entropy_estimate(b""), 0.0);
        assert_eq!(entropy_estimate(b"aaaa"), 0.0);
        assert_eq!(entropy_estimate(b"abab"), 1.0);
        let all: Vec<u8> = (0..=255).collect();
        assert!((entropy_estimate(&all) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn decodable() {
        let codec = Codec::glyphmatics();
        let glyphs = codec.text_to_glyphs("entropy");
        let fp = codec.fingerprint(&glyphs);
        assert_eq!(fp.length, 14);
        assert_eq!(fp.byte_checksum, crc32fast::hash(b"entropy"));
        assert_eq!(fp.glyph_checksum, crc32fast::hash(glyphs.as_bytes()));
        assert_eq!(fp.glyph_checksum, codec.glyph_checksum(&glyphs));
        assert!(fp.entropy_estimate > 0.0);
    }

    #[test]
    fn normalizes_first() {
        let codec = Codec::glyphmatics();
        let glyphs = codec.text_to_glyphs("entropy");
        let noisy = format!(" {} \n", glyphs);
        assert_eq!(codec.fingerprint(&noisy), codec.fingerprint(&glyphs));
    }

    #[test]
    fn undecodable_degrades() {
        let codec = Codec::glyphmatics();
        // Odd length
        let fp = codec.fingerprint("✶✷✸");
        assert_eq!(fp.length, 3);
        assert_eq!(fp.byte_checksum, 0);
        assert_eq!(fp.entropy_estimate, 0.0);
        assert_eq!(fp.glyph_checksum, crc32fast::hash("✶✷✸".as_bytes()));
        // Even length, but the pair (110, 110) is far past 255
        let fp = codec.fingerprint("⊐⊐");
        assert_eq!(fp.length, 2);
        assert_eq!(fp.byte_checksum, 0);
    }
}
