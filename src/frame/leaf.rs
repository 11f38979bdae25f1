use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::{read_header, write_header, Framer, Metadata, Reader, LEAF_VERSION};
use crate::envelope;
use crate::error::{Error, Layer, Result};

// Block format:
//  1. u8 type tag (0 terminates the block list)
//  2. u8 name length, then the name bytes
//  3. u16 dims, f32 value_min, f32 value_max
//  4. u32 payload length, then the payload
//
//  All integers are little-endian.

/// Longest block name that can be stored. Longer names are cut at encode time.
pub const MAX_NAME_LEN: usize = u8::MAX as usize;

const TAG_END: u8 = 0;
const TAG_BLOB: u8 = 1;

/// The kind of a block, stored as its type tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    /// Opaque binary payload.
    #[default]
    Blob,
}

impl From<BlockKind> for u8 {
    fn from(val: BlockKind) -> u8 {
        match val {
            BlockKind::Blob => TAG_BLOB,
        }
    }
}

impl TryFrom<u8> for BlockKind {
    type Error = u8;
    fn try_from(val: u8) -> Result<BlockKind, u8> {
        match val {
            TAG_BLOB => Ok(BlockKind::Blob),
            _ => Err(val),
        }
    }
}

/// One named, typed payload inside a leaf frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    pub name: String,
    pub dims: u16,
    pub value_min: f32,
    pub value_max: f32,
    #[serde(with = "serde_bytes")]
    pub payload: Vec<u8>,
}

impl Block {
    /// A blob block with zeroed numeric fields.
    pub fn blob(name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            kind: BlockKind::Blob,
            name: name.into(),
            payload,
            ..Self::default()
        }
    }

    fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
        let name = self.name.as_bytes();
        let name = &name[..name.len().min(MAX_NAME_LEN)];
        let payload_len = u32::try_from(self.payload.len()).map_err(|_| Error::LengthTooLong {
            max: u32::MAX as usize,
            actual: self.payload.len(),
        })?;
        buf.push(self.kind.into());
        buf.push(name.len() as u8);
        buf.extend_from_slice(name);
        buf.extend_from_slice(&self.dims.to_le_bytes());
        buf.extend_from_slice(&self.value_min.to_le_bytes());
        buf.extend_from_slice(&self.value_max.to_le_bytes());
        buf.extend_from_slice(&payload_len.to_le_bytes());
        buf.extend_from_slice(&self.payload);
        Ok(())
    }

    /// Parse the rest of a block whose type tag has already been read.
    fn decode(kind: BlockKind, reader: &mut Reader) -> Result<Self> {
        let name_len = reader.u8("get block name length")? as usize;
        let name = String::from_utf8_lossy(reader.bytes(name_len, "get block name")?).into_owned();
        let dims = reader.u16("get block dims")?;
        let value_min = reader.f32("get block value_min")?;
        let value_max = reader.f32("get block value_max")?;
        let payload_len = reader.u32("get block payload length")? as usize;
        let payload = reader.bytes(payload_len, "get block payload")?.to_vec();
        Ok(Self {
            kind,
            name,
            dims,
            value_min,
            value_max,
            payload,
        })
    }
}

/// A decoded leaf frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Leaf {
    pub metadata: Metadata,
    pub blocks: Vec<Block>,
}

impl Leaf {
    /// First block with the given name.
    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.name == name)
    }
}

impl Framer {
    /// Serialize a leaf frame and seal it in an envelope. Block order is preserved.
    pub fn encode_leaf(&self, metadata: &Metadata, blocks: &[Block]) -> Result<Vec<u8>> {
        let mut raw = Vec::new();
        write_header(&mut raw, LEAF_VERSION, metadata)?;
        for block in blocks {
            block.encode(&mut raw)?;
        }
        raw.push(TAG_END);
        let sealed = envelope::seal(&raw, self.level())?;
        debug!(
            blocks = blocks.len(),
            raw = raw.len(),
            sealed = sealed.len(),
            "encoded leaf frame"
        );
        Ok(sealed)
    }

    /// Open a leaf envelope and parse it.
    ///
    /// Blocks are read until the terminator tag. Running out of data exactly at a block boundary
    /// without seeing a terminator is accepted, and whatever was read is returned.
    pub fn decode_leaf(&self, envelope: &[u8]) -> Result<Leaf> {
        let raw = envelope::open(envelope, Layer::Leaf, self.max_size())?;
        let mut reader = Reader::new(&raw);
        let metadata = read_header(&mut reader, LEAF_VERSION)?;
        let mut blocks = Vec::new();
        loop {
            if reader.is_empty() {
                warn!(blocks = blocks.len(), "leaf frame ended without a terminator");
                break;
            }
            let tag = reader.u8("get block type")?;
            if tag == TAG_END {
                break;
            }
            let kind = BlockKind::try_from(tag)
                .map_err(|t| Error::Format(format!("unknown block type tag {}", t)))?;
            let block = Block::decode(kind, &mut reader)?;
            trace!(name = %block.name, len = block.payload.len(), "parsed block");
            blocks.push(block);
        }
        debug!(blocks = blocks.len(), raw = raw.len(), "decoded leaf frame");
        Ok(Leaf { metadata, blocks })
    }
}
