//! Explicit construction of codecs, framers, and sigil settings.
//!
//! ```json
//! {
//!   "alphabet": ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "a", "b", "c", "d", "e", "f"],
//!   "compression_level": 3,
//!   "max_frame_size": 16777216,
//!   "sigil": { "base_codepoint": "U+E000", "capacity": 6400 }
//! }
//! ```
//!
//! Every field is optional. Without an `alphabet`, the fixed 111-glyph alphabet is used.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::alphabet::Alphabet;
use crate::codec::Codec;
use crate::compress::DEFAULT_LEVEL;
use crate::error::{Error, Result};
use crate::frame::{Framer, DEFAULT_MAX_FRAME_SIZE};
use crate::sigil::SigilConfig;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alphabet: Option<Vec<String>>,
    pub compression_level: i32,
    pub max_frame_size: usize,
    pub sigil: SigilConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alphabet: None,
            compression_level: DEFAULT_LEVEL,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            sigil: SigilConfig::default(),
        }
    }
}

impl Config {
    /// Parse a configuration document. The alphabet, if any, is checked immediately.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.alphabet()?;
        if self.max_frame_size == 0 {
            return Err(Error::Config("max_frame_size must be nonzero".into()));
        }
        Ok(())
    }

    /// The configured alphabet, or the 111-glyph alphabet if none was given.
    pub fn alphabet(&self) -> Result<Alphabet> {
        match &self.alphabet {
            Some(symbols) => Alphabet::from_strings(symbols),
            None => Ok(Alphabet::glyphmatics()),
        }
    }

    pub fn codec(&self) -> Result<Codec> {
        Ok(Codec::new(self.alphabet()?))
    }

    pub fn framer(&self) -> Framer {
        Framer::new(self.compression_level, self.max_frame_size)
    }

    pub fn sigil(&self) -> SigilConfig {
        self.sigil
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sigil::Codepoint;

    #[test]
    fn defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.codec().unwrap(), Codec::glyphmatics());
        assert_eq!(config.framer(), Framer::default());
        assert_eq!(config.sigil(), SigilConfig::default());
    }

    #[test]
    fn full() {
        let config = Config::from_json(
            r#"{
                "alphabet": ["0","1","2","3","4","5","6","7","8","9","a","b","c","d","e","f"],
                "compression_level": 19,
                "max_frame_size": 4096,
                "sigil": {"base_codepoint": "U+F0000", "capacity": 10}
            }"#,
        )
        .unwrap();
        let codec = config.codec().unwrap();
        assert_eq!(codec.base(), 16);
        assert_eq!(codec.byte_to_glyphs(&[0xAB]), "ab");
        assert_eq!(config.framer(), Framer::new(19, 4096));
        assert_eq!(config.sigil().base_codepoint, Codepoint(0xF0000));
        assert_eq!(config.sigil().capacity, 10);
    }

    #[test]
    fn bad_alphabet() {
        assert!(matches!(
            Config::from_json(r#"{"alphabet": ["a", "b"]}"#).unwrap_err(),
            Error::InvalidAlphabet(_)
        ));
        let mut dup: Vec<String> = (0..16).map(|i| format!("{:x}", i)).collect();
        dup[15] = "0".into();
        let json = serde_json::json!({ "alphabet": dup }).to_string();
        assert!(matches!(
            Config::from_json(&json).unwrap_err(),
            Error::InvalidAlphabet(_)
        ));
    }

    #[test]
    fn bad_json() {
        assert!(matches!(
            Config::from_json(r#"{"compression_level": "high"}"#).unwrap_err(),
            Error::Json(_)
        ));
        assert!(matches!(
            Config::from_json(r#"{"max_frame_size": 0}"#).unwrap_err(),
            Error::Config(_)
        ));
    }

    #[test]
    fn load_file() {
        let path = std::env::temp_dir().join(format!("glyph-pack-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"compression_level": 7}"#).unwrap();
        let config = Config::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.framer().level(), 7);

        assert!(matches!(
            Config::load(std::env::temp_dir().join("glyph-pack-missing.json")).unwrap_err(),
            Error::Io(_)
        ));
    }
}
