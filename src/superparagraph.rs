//! Superparagraph records and their armored single-line form.
//!
//! A record is stored as compact sorted-key JSON in a block named `superparagraph` inside a leaf
//! frame. The leaf goes into a page frame, and the page is armored into one line of text.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::armor::{armor_line, unarmor_line};
use crate::error::{Error, Result};
use crate::frame::{Block, Framer, Metadata};

/// Name of the block holding the record JSON.
pub const BLOCK_NAME: &str = "superparagraph";
/// Value of the `comp` field in superparagraph leaf metadata.
pub const COMPONENT: &str = "superparagraph";
/// Format version recorded in the leaf metadata.
pub const RECORD_VERSION: &str = "1.0.0";
/// Line title used when the caller has none.
pub const DEFAULT_TITLE: &str = "GNGM-SUPERPARAGRAPH";

/// A structured semantic record. Fields beyond the known ones are kept in `extra` and survive
/// the round trip.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Superparagraph {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub glyphs: String,
    #[serde(default)]
    pub meta: Metadata,
    #[serde(flatten)]
    pub extra: Metadata,
}

impl Framer {
    /// Encode a record into an armored line under `title`.
    pub fn encode_superparagraph(&self, record: &Superparagraph, title: &str) -> Result<String> {
        // Going through Value sorts every key, flattened extras included.
        let payload = serde_json::to_vec(&serde_json::to_value(record)?)?;

        let mut meta = Metadata::new();
        meta.insert("comp".into(), Value::from(COMPONENT));
        meta.insert("version".into(), Value::from(RECORD_VERSION));
        meta.insert("word".into(), Value::from(record.word.as_str()));
        meta.insert("meta".into(), Value::Object(record.meta.clone()));

        let leaf = self.encode_leaf(&meta, &[Block::blob(BLOCK_NAME, payload)])?;
        let page = self.encode_page(title, &leaf, None)?;
        let line = armor_line(title, &page);
        debug!(word = %record.word, leaf = leaf.len(), page = page.len(), "encoded superparagraph");
        Ok(line)
    }

    /// Decode an armored line back into its record.
    pub fn decode_superparagraph(&self, line: &str) -> Result<Superparagraph> {
        let page = unarmor_line(line);
        let inner = self.decode_page(&page)?;
        let leaf = self.decode_leaf(&inner)?;
        let block = leaf
            .block(BLOCK_NAME)
            .ok_or_else(|| Error::MissingBlock(BLOCK_NAME.to_owned()))?;
        let record: Superparagraph = serde_json::from_slice(&block.payload)?;
        debug!(word = %record.word, "decoded superparagraph");
        Ok(record)
    }
}

/// Encode a record with default frame settings.
pub fn encode_superparagraph(record: &Superparagraph, title: &str) -> Result<String> {
    Framer::default().encode_superparagraph(record, title)
}

/// Decode an armored line with default frame settings.
pub fn decode_superparagraph(line: &str) -> Result<Superparagraph> {
    Framer::default().decode_superparagraph(line)
}
