use std::{cell::RefCell, fmt};

thread_local! {
    static ZSTD_CCTX: RefCell<zstd_safe::CCtx<'static>> = RefCell::new(zstd_safe::CCtx::create());
    static ZSTD_DCTX: RefCell<zstd_safe::DCtx<'static>> = RefCell::new(zstd_safe::DCtx::create());
}

#[derive(Debug, Clone)]
pub enum CompressionError {
    ExceededSize { max: usize, actual: usize },
    ZstdInner(usize),
    Parsing(&'static str),
}

impl fmt::Display for CompressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionError::ExceededSize { max, actual } => write!(
                f,
                "Decompressed size is {} bytes, larger than max of {} kiB",
                actual,
                (max + 1) >> 10
            ),
            CompressionError::ZstdInner(v) => write!(
                f,
                "zstd failure, code {} ({})",
                v,
                zstd_safe::get_error_name(*v)
            ),
            CompressionError::Parsing(s) => f.write_str(s),
        }
    }
}

impl std::error::Error for CompressionError {}

impl From<zstd_safe::ErrorCode> for CompressionError {
    fn from(value: zstd_safe::ErrorCode) -> Self {
        CompressionError::ZstdInner(value)
    }
}

/// The zstd compression level used by default for both envelope layers.
pub const DEFAULT_LEVEL: i32 = 3;

/// Compress `input` into a single zstd frame appended to `output`. The frame always records its
/// content size, which [`zstd_decompress`] relies on to bound its allocation.
pub(crate) fn zstd_compress(
    input: &[u8],
    output: &mut Vec<u8>,
    level: i32,
) -> Result<usize, CompressionError> {
    use zstd_safe::*;
    ZSTD_CCTX.with_borrow_mut(|ctx| {
        ctx.reset(ResetDirective::SessionAndParameters)?;
        ctx.set_parameter(CParameter::CompressionLevel(level))?;
        ctx.set_parameter(CParameter::ChecksumFlag(false))?;
        ctx.set_parameter(CParameter::ContentSizeFlag(true))?;
        ctx.set_pledged_src_size(Some(input.len() as u64))?;

        // Reserve space for the output
        output.reserve(compress_bound(input.len()));
        let out_buffer = output.spare_capacity_mut();

        // SAFETY:
        // zstd only writes into the spare capacity we hand it, and we only extend the vec by the
        // number of bytes it reports as written.
        let used_len = unsafe {
            let out_buffer = core::slice::from_raw_parts_mut(
                out_buffer.as_mut_ptr() as *mut u8,
                out_buffer.len(),
            );
            let used_len = ctx.compress2(out_buffer, input)?;
            output.set_len(used_len + output.len());
            used_len
        };

        Ok(used_len)
    })
}

/// Decompress one zstd frame from `input`, appending to `output`. Fails before allocating if the
/// frame's declared content size would push `output` past `max_size`.
pub(crate) fn zstd_decompress(
    input: &[u8],
    output: &mut Vec<u8>,
    max_size: usize,
) -> Result<usize, CompressionError> {
    use zstd_safe::*;

    let out_size = match get_frame_content_size(input) {
        Ok(Some(size)) => size,
        Ok(None) => return Err(CompressionError::Parsing("Missing frame content size")),
        Err(_) => return Err(CompressionError::Parsing("Not a zstd frame")),
    };
    let final_size = (out_size as u128) + (output.len() as u128);
    if final_size > max_size as u128 {
        return Err(CompressionError::ExceededSize {
            max: max_size,
            actual: final_size.min(usize::MAX as u128) as usize,
        });
    }
    let out_size = out_size as usize;
    output.reserve(out_size);

    ZSTD_DCTX.with_borrow_mut(|dtx| {
        dtx.reset(ResetDirective::SessionAndParameters)?;

        // SAFETY:
        // We're just passing the spare capacity directly to zstd to fill out,
        // then adjusting the vec up by how much zstd filled in.
        let out_buffer = output.spare_capacity_mut();
        let used_len = unsafe {
            let out_buffer = core::slice::from_raw_parts_mut(
                out_buffer.as_mut_ptr() as *mut u8,
                out_buffer.len(),
            );
            let used_len = dtx.decompress(out_buffer, input)?;
            output.set_len(used_len + output.len());
            used_len
        };
        if used_len != out_size {
            return Err(CompressionError::Parsing(
                "Decompressed size doesn't match promised size",
            ));
        }

        Ok(used_len)
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn roundtrip() {
        let raw = b"GLYPHLLM entropy entropy entropy entropy entropy".repeat(20);
        let mut compressed = Vec::new();
        let len = zstd_compress(&raw, &mut compressed, DEFAULT_LEVEL).unwrap();
        assert_eq!(len, compressed.len());
        assert!(compressed.len() < raw.len());
        let mut out = Vec::new();
        zstd_decompress(&compressed, &mut out, 1 << 20).unwrap();
        assert_eq!(out, raw);
    }

    #[test]
    fn empty() {
        let mut compressed = Vec::new();
        zstd_compress(&[], &mut compressed, DEFAULT_LEVEL).unwrap();
        let mut out = Vec::new();
        zstd_decompress(&compressed, &mut out, 16).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn size_limit() {
        let raw = vec![0xAAu8; 4096];
        let mut compressed = Vec::new();
        zstd_compress(&raw, &mut compressed, DEFAULT_LEVEL).unwrap();
        let mut out = Vec::new();
        match zstd_decompress(&compressed, &mut out, 4095).unwrap_err() {
            CompressionError::ExceededSize { max: 4095, actual: 4096 } => (),
            e => panic!("unexpected error {:?}", e),
        }
        assert!(out.is_empty());
    }

    #[test]
    fn garbage() {
        let mut out = Vec::new();
        zstd_decompress(b"definitely not zstd", &mut out, 1 << 20).unwrap_err();
    }
}
