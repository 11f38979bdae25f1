use std::fmt;
use std::string::FromUtf8Error;

use crate::compress::CompressionError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Which envelope layer an integrity failure was found in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Leaf,
    Page,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Layer::Leaf => f.write_str("leaf"),
            Layer::Page => f.write_str("page"),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    /// CRC-32 over the compressed bytes of an envelope didn't match the stored trailer.
    Checksum {
        layer: Layer,
        expected: u32,
        actual: u32,
    },
    /// Bad magic, unexpected version, unknown block tag, or unparseable metadata.
    Format(String),
    /// A glyphstring had an odd number of symbols after normalization.
    OddLength(usize),
    /// A symbol pair decoded to a code outside of the byte range.
    InvalidPair { hi: usize, lo: usize, code: usize },
    /// A character outside the alphabet was found during strict decoding.
    UnknownSymbol(char),
    /// Decoded bytes were not valid UTF-8.
    Encoding(FromUtf8Error),
    /// More lexicon entries than there are reserved sigil codepoints.
    Capacity { entries: usize, capacity: usize },
    /// Two accepted lexicon entries landed on the same sigil.
    Collision {
        index: usize,
        codepoint: String,
        first: String,
        second: String,
    },
    /// A computed sigil codepoint isn't a Unicode scalar value.
    InvalidCodepoint(u32),
    /// A codepoint string couldn't be parsed.
    ParseCodepoint(String),
    /// An alphabet definition was rejected.
    InvalidAlphabet(String),
    /// Frame ended too early.
    LengthTooShort {
        step: &'static str,
        actual: usize,
        expected: usize,
    },
    /// A length field or decompressed frame exceeded what the format allows.
    LengthTooLong { max: usize, actual: usize },
    /// zstd failed to decompress an envelope.
    FailDecompress(String),
    /// Metadata or record JSON failed to (de)serialize.
    Json(serde_json::Error),
    /// A leaf frame didn't contain the named block.
    MissingBlock(String),
    /// A configuration value was out of range.
    Config(String),
    /// Reading a configuration file failed.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Checksum {
                layer,
                expected,
                actual,
            } => write!(
                f,
                "{} envelope CRC mismatch: stored 0x{:08x}, computed 0x{:08x}",
                layer, expected, actual
            ),
            Error::Format(ref err) => write!(f, "Bad frame format: {}", err),
            Error::OddLength(len) => write!(
                f,
                "Glyphstring length must be even for the pair codec, got {}",
                len
            ),
            Error::InvalidPair { hi, lo, code } => write!(
                f,
                "Invalid glyph pair ({}, {}): code {} is not a byte",
                hi, lo, code
            ),
            Error::UnknownSymbol(c) => {
                write!(f, "Unknown glyph {:?} (U+{:04X})", c, c as u32)
            }
            Error::Encoding(ref err) => write!(f, "Decoded bytes are not UTF-8: {}", err),
            Error::Capacity { entries, capacity } => write!(
                f,
                "Too many entries ({}) for the configured sigil capacity ({})",
                entries, capacity
            ),
            Error::Collision {
                index,
                ref codepoint,
                ref first,
                ref second,
            } => write!(
                f,
                "Sigil collision at index {} ({}) between words {:?} and {:?}",
                index, codepoint, first, second
            ),
            Error::InvalidCodepoint(cp) => {
                write!(f, "U+{:04X} is not a valid sigil codepoint", cp)
            }
            Error::ParseCodepoint(ref s) => write!(f, "Can't parse {:?} as a codepoint", s),
            Error::InvalidAlphabet(ref err) => write!(f, "Invalid alphabet: {}", err),
            Error::LengthTooShort {
                step,
                actual,
                expected,
            } => write!(
                f,
                "Expected data length {}, but got {} on step [{}]",
                expected, actual, step
            ),
            Error::LengthTooLong { max, actual } => write!(
                f,
                "Data too long: was {} bytes, maximum allowed is {}",
                actual, max
            ),
            Error::FailDecompress(ref err) => write!(f, "Failed decompression step: {}", err),
            Error::Json(ref err) => write!(f, "JSON failure: {}", err),
            Error::MissingBlock(ref name) => write!(f, "Leaf frame has no block named {:?}", name),
            Error::Config(ref err) => write!(f, "Invalid configuration: {}", err),
            Error::Io(ref err) => write!(f, "I/O failure: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Encoding(ref err) => Some(err),
            Error::Json(ref err) => Some(err),
            Error::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<FromUtf8Error> for Error {
    fn from(e: FromUtf8Error) -> Self {
        Self::Encoding(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<CompressionError> for Error {
    fn from(e: CompressionError) -> Self {
        match e {
            CompressionError::ExceededSize { max, actual } => Self::LengthTooLong { max, actual },
            e => Self::FailDecompress(e.to_string()),
        }
    }
}
