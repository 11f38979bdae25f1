#![no_main]
use libfuzzer_sys::fuzz_target;
use glyph_pack::{decode_leaf, decode_page};

fuzz_target!(|data: &[u8]| {
    let _ = decode_leaf(data);
    if let Ok(inner) = decode_page(data) {
        let _ = decode_leaf(&inner);
    }
});
