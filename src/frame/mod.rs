//! Leaf and page container frames.
//!
//! Both frame kinds share a header:
//!
//! ```text
//! b"GLYPHLLM" | u8(version) | u16_le(meta_len) | meta
//! ```
//!
//! where `meta` is a compact JSON object with sorted keys. A leaf frame (version 2) follows the
//! header with a list of named blocks; a page frame (version 3) follows it with one
//! length-prefixed opaque payload, normally an enveloped leaf. Each serialized frame is sealed in
//! its own [envelope](crate::envelope), so a page holding a leaf carries two independent
//! compress+CRC layers.

mod leaf;
mod page;

pub use self::leaf::{Block, BlockKind, Leaf, MAX_NAME_LEN};
pub use self::page::{Page, PAGE_SCHEME};

use byteorder::{LittleEndian, ReadBytesExt};
use serde_json::Value;

use crate::compress::DEFAULT_LEVEL;
use crate::error::{Error, Result};

/// Magic bytes opening every raw frame.
pub const MAGIC: &[u8; 8] = b"GLYPHLLM";
/// Version byte of a leaf frame.
pub const LEAF_VERSION: u8 = 2;
/// Version byte of a page frame.
pub const PAGE_VERSION: u8 = 3;
/// Default upper bound on a decompressed frame: 16 MiB.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 1usize << 24;

/// Frame metadata: a JSON object. `serde_json::Map` keeps keys sorted, which makes the encoded
/// form canonical.
pub type Metadata = serde_json::Map<String, Value>;

/// Encoder/decoder settings for both frame kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Framer {
    level: i32,
    max_size: usize,
}

impl Framer {
    /// Create a framer with the given zstd compression level and maximum decompressed frame size.
    pub fn new(level: i32, max_size: usize) -> Self {
        Self { level, max_size }
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Default for Framer {
    fn default() -> Self {
        Self::new(DEFAULT_LEVEL, DEFAULT_MAX_FRAME_SIZE)
    }
}

/// Encode a leaf frame with default settings.
pub fn encode_leaf(metadata: &Metadata, blocks: &[Block]) -> Result<Vec<u8>> {
    Framer::default().encode_leaf(metadata, blocks)
}

/// Decode a leaf envelope with default settings.
pub fn decode_leaf(envelope: &[u8]) -> Result<Leaf> {
    Framer::default().decode_leaf(envelope)
}

/// Encode a page frame around `inner` with default settings.
pub fn encode_page(title: &str, inner: &[u8], extra: Option<&Metadata>) -> Result<Vec<u8>> {
    Framer::default().encode_page(title, inner, extra)
}

/// Decode a page envelope with default settings, returning the inner envelope.
pub fn decode_page(envelope: &[u8]) -> Result<Vec<u8>> {
    Framer::default().decode_page(envelope)
}

fn write_header(buf: &mut Vec<u8>, version: u8, metadata: &Metadata) -> Result<()> {
    let meta = serde_json::to_vec(metadata)?;
    let meta_len = u16::try_from(meta.len()).map_err(|_| Error::LengthTooLong {
        max: u16::MAX as usize,
        actual: meta.len(),
    })?;
    buf.extend_from_slice(MAGIC);
    buf.push(version);
    buf.extend_from_slice(&meta_len.to_le_bytes());
    buf.extend_from_slice(&meta);
    Ok(())
}

/// Cursor over a raw frame. Every read that runs off the end is a `LengthTooShort`.
pub(crate) struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub(crate) fn u8(&mut self, step: &'static str) -> Result<u8> {
        self.data.read_u8().map_err(|_| Error::LengthTooShort {
            step,
            actual: 0,
            expected: 1,
        })
    }

    pub(crate) fn u16(&mut self, step: &'static str) -> Result<u16> {
        let actual = self.data.len();
        self.data
            .read_u16::<LittleEndian>()
            .map_err(|_| Error::LengthTooShort {
                step,
                actual,
                expected: 2,
            })
    }

    pub(crate) fn u32(&mut self, step: &'static str) -> Result<u32> {
        let actual = self.data.len();
        self.data
            .read_u32::<LittleEndian>()
            .map_err(|_| Error::LengthTooShort {
                step,
                actual,
                expected: 4,
            })
    }

    pub(crate) fn f32(&mut self, step: &'static str) -> Result<f32> {
        let actual = self.data.len();
        self.data
            .read_f32::<LittleEndian>()
            .map_err(|_| Error::LengthTooShort {
                step,
                actual,
                expected: 4,
            })
    }

    pub(crate) fn bytes(&mut self, len: usize, step: &'static str) -> Result<&'a [u8]> {
        if len > self.data.len() {
            return Err(Error::LengthTooShort {
                step,
                actual: self.data.len(),
                expected: len,
            });
        }
        let (head, tail) = self.data.split_at(len);
        self.data = tail;
        Ok(head)
    }
}

/// Check magic and version, then parse the metadata object.
fn read_header(reader: &mut Reader, version: u8) -> Result<Metadata> {
    let magic = reader.bytes(MAGIC.len(), "get frame magic")?;
    if magic != MAGIC {
        return Err(Error::Format(format!("bad magic {:02x?}", magic)));
    }
    let found = reader.u8("get frame version")?;
    if found != version {
        return Err(Error::Format(format!(
            "expected frame version {}, found {}",
            version, found
        )));
    }
    let meta_len = reader.u16("get metadata length")? as usize;
    let meta = reader.bytes(meta_len, "get metadata")?;
    let meta = serde_json::from_slice::<Value>(meta)
        .map_err(|e| Error::Format(format!("bad frame metadata: {}", e)))?;
    match meta {
        Value::Object(map) => Ok(map),
        other => Err(Error::Format(format!(
            "frame metadata must be a JSON object, found {}",
            other
        ))),
    }
}
