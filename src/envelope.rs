//! The compress-then-checksum wrapper shared by both frame kinds.
//!
//! ```text
//! envelope = zstd(raw) | u32_le(crc32(zstd(raw)))
//! ```
//!
//! The checksum covers the compressed bytes, so corruption is caught before any decompression
//! is attempted.

use byteorder::{ByteOrder, LittleEndian};
use tracing::trace;

use crate::compress::{zstd_compress, zstd_decompress};
use crate::error::{Error, Layer, Result};

/// Size of the CRC-32 trailer.
pub const CRC_LEN: usize = 4;

/// Compress `raw` and append the CRC-32 of the compressed bytes.
pub fn seal(raw: &[u8], level: i32) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    zstd_compress(raw, &mut out, level)?;
    let crc = crc32fast::hash(&out);
    let mut trailer = [0u8; CRC_LEN];
    LittleEndian::write_u32(&mut trailer, crc);
    out.extend_from_slice(&trailer);
    trace!(raw = raw.len(), sealed = out.len(), "sealed envelope");
    Ok(out)
}

/// Verify the CRC trailer, then decompress. Fails with [`Error::Checksum`] on any mismatch,
/// without touching the compressed payload.
pub fn open(envelope: &[u8], layer: Layer, max_size: usize) -> Result<Vec<u8>> {
    if envelope.len() < CRC_LEN {
        return Err(Error::LengthTooShort {
            step: "get envelope checksum",
            actual: envelope.len(),
            expected: CRC_LEN,
        });
    }
    let (compressed, trailer) = envelope.split_at(envelope.len() - CRC_LEN);
    let expected = LittleEndian::read_u32(trailer);
    let actual = crc32fast::hash(compressed);
    if expected != actual {
        return Err(Error::Checksum {
            layer,
            expected,
            actual,
        });
    }
    let mut raw = Vec::new();
    zstd_decompress(compressed, &mut raw, max_size)?;
    trace!(%layer, sealed = envelope.len(), raw = raw.len(), "opened envelope");
    Ok(raw)
}
