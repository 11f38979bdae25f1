#![no_main]
use libfuzzer_sys::fuzz_target;
use glyph_pack::{decode_superparagraph, Codec};

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        let _ = decode_superparagraph(line);
        let codec = Codec::glyphmatics();
        let _ = codec.glyphs_to_text(line);
        let _ = codec.inner_dialog_decode(line, Some("key"));
    }
});
