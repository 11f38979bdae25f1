use serde_json::Value;
use tracing::debug;

use super::{read_header, write_header, Framer, Metadata, Reader, LEAF_VERSION, PAGE_VERSION};
use crate::envelope;
use crate::error::{Error, Layer, Result};

/// The only paging scheme: one page holding one leaf.
pub const PAGE_SCHEME: &str = "single-leaf";

/// A decoded page frame. The inner envelope is left sealed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub metadata: Metadata,
    pub inner: Vec<u8>,
}

fn page_metadata(title: &str, extra: Option<&Metadata>) -> Metadata {
    let mut meta = Metadata::new();
    meta.insert("comp".into(), Value::from("book_page"));
    meta.insert("title".into(), Value::from(title));
    meta.insert("page_index".into(), Value::from(1));
    meta.insert("page_count".into(), Value::from(1));
    meta.insert("inner_version".into(), Value::from(LEAF_VERSION));
    meta.insert("scheme".into(), Value::from(PAGE_SCHEME));
    if let Some(extra) = extra {
        meta.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    meta
}

impl Framer {
    /// Wrap an already-sealed inner envelope in a page frame and seal that too. Fields in `extra`
    /// override the default page metadata.
    pub fn encode_page(&self, title: &str, inner: &[u8], extra: Option<&Metadata>) -> Result<Vec<u8>> {
        let inner_len = u32::try_from(inner.len()).map_err(|_| Error::LengthTooLong {
            max: u32::MAX as usize,
            actual: inner.len(),
        })?;
        let mut raw = Vec::with_capacity(inner.len() + 128);
        write_header(&mut raw, PAGE_VERSION, &page_metadata(title, extra))?;
        raw.extend_from_slice(&inner_len.to_le_bytes());
        raw.extend_from_slice(inner);
        let sealed = envelope::seal(&raw, self.level())?;
        debug!(title, inner = inner.len(), sealed = sealed.len(), "encoded page frame");
        Ok(sealed)
    }

    /// Open a page envelope and return the inner envelope it carries. The inner envelope's own
    /// checksum is not checked here; that happens when it is opened.
    pub fn decode_page(&self, envelope: &[u8]) -> Result<Vec<u8>> {
        Ok(self.decode_page_with_metadata(envelope)?.inner)
    }

    /// Like [`Framer::decode_page`], but also returns the page metadata.
    pub fn decode_page_with_metadata(&self, envelope: &[u8]) -> Result<Page> {
        let raw = envelope::open(envelope, Layer::Page, self.max_size())?;
        let mut reader = Reader::new(&raw);
        let metadata = read_header(&mut reader, PAGE_VERSION)?;
        let inner_len = reader.u32("get inner length")? as usize;
        let inner = reader.bytes(inner_len, "get inner envelope")?.to_vec();
        debug!(inner = inner.len(), "decoded page frame");
        Ok(Page { metadata, inner })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compress::DEFAULT_LEVEL;
    use crate::frame::{decode_leaf, decode_page, encode_leaf, encode_page, Block};
    use serde_json::json;

    fn obj(value: Value) -> Metadata {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn nesting() {
        let meta = obj(json!({"word": "entropy"}));
        let blocks = vec![
            Block {
                dims: 2,
                value_min: 0.25,
                value_max: -7.0,
                ..Block::blob("first", b"abc".to_vec())
            },
            Block::blob("second", b"def".to_vec()),
        ];
        let leaf_env = encode_leaf(&meta, &blocks).unwrap();
        let page_env = encode_page("entropy", &leaf_env, None).unwrap();
        let inner = decode_page(&page_env).unwrap();
        assert_eq!(inner, leaf_env);
        let leaf = decode_leaf(&inner).unwrap();
        assert_eq!(leaf.metadata, meta);
        assert_eq!(leaf.blocks, blocks);
    }

    #[test]
    fn default_metadata() {
        let env = encode_page("Title", b"payload", None).unwrap();
        let page = Framer::default().decode_page_with_metadata(&env).unwrap();
        assert_eq!(
            page.metadata,
            obj(json!({
                "comp": "book_page",
                "title": "Title",
                "page_index": 1,
                "page_count": 1,
                "inner_version": 2,
                "scheme": "single-leaf",
            }))
        );
        assert_eq!(page.inner, b"payload");
    }

    #[test]
    fn extra_metadata_overrides() {
        let extra = obj(json!({"scheme": "custom", "lang": "en"}));
        let env = encode_page("Title", b"", Some(&extra)).unwrap();
        let page = Framer::default().decode_page_with_metadata(&env).unwrap();
        assert_eq!(page.metadata["scheme"], "custom");
        assert_eq!(page.metadata["lang"], "en");
        assert_eq!(page.metadata["title"], "Title");
        assert!(page.inner.is_empty());
    }

    #[test]
    fn inner_not_validated() {
        // Page decoding hands back whatever it carries, even a corrupt leaf.
        let mut leaf_env = encode_leaf(&Metadata::new(), &[]).unwrap();
        leaf_env[0] ^= 0xFF;
        let page_env = encode_page("t", &leaf_env, None).unwrap();
        let inner = decode_page(&page_env).unwrap();
        assert_eq!(inner, leaf_env);
        assert!(matches!(
            decode_leaf(&inner).unwrap_err(),
            Error::Checksum {
                layer: Layer::Leaf,
                ..
            }
        ));
    }

    #[test]
    fn bit_flips() {
        let leaf_env = encode_leaf(&obj(json!({"w": "x"})), &[Block::blob("b", vec![1, 2])]).unwrap();
        let page_env = encode_page("t", &leaf_env, None).unwrap();
        for byte in 0..page_env.len() {
            let mut bad = page_env.clone();
            bad[byte] ^= 0x10;
            assert!(matches!(
                decode_page(&bad).unwrap_err(),
                Error::Checksum {
                    layer: Layer::Page,
                    ..
                }
            ));
        }
    }

    #[test]
    fn short_inner() {
        let mut raw = Vec::new();
        write_header(&mut raw, PAGE_VERSION, &Metadata::new()).unwrap();
        raw.extend_from_slice(&10u32.to_le_bytes());
        raw.extend_from_slice(b"short");
        let env = envelope::seal(&raw, DEFAULT_LEVEL).unwrap();
        assert!(matches!(
            decode_page(&env).unwrap_err(),
            Error::LengthTooShort { .. }
        ));
    }

    #[test]
    fn leaf_is_not_a_page() {
        let env = encode_leaf(&Metadata::new(), &[]).unwrap();
        assert!(matches!(decode_page(&env).unwrap_err(), Error::Format(_)));
    }
}
