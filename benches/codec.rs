//! Benchmarks for the glyph codec and the frame pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};

use glyph_pack::{
    decode_leaf, decode_superparagraph, encode_leaf, encode_superparagraph, Block, Codec, Metadata,
    Superparagraph,
};

fn random_bytes(len: usize) -> Vec<u8> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    (0..len).map(|_| rng.gen()).collect()
}

fn bench_codec(c: &mut Criterion) {
    let codec = Codec::glyphmatics();
    let data = random_bytes(4096);
    let glyphs = codec.byte_to_glyphs(&data);

    c.bench_function("byte_to_glyphs_4k", |bench| {
        bench.iter(|| black_box(codec.byte_to_glyphs(&data)))
    });
    c.bench_function("glyphs_to_bytes_4k", |bench| {
        bench.iter(|| black_box(codec.glyphs_to_bytes(&glyphs).unwrap()))
    });
}

fn bench_algebra(c: &mut Criterion) {
    let codec = Codec::glyphmatics();
    let a = codec.byte_to_glyphs(&random_bytes(1024));
    let key = codec.text_to_glyphs("GlyphNotes-Inner");

    c.bench_function("add_2k", |bench| bench.iter(|| black_box(codec.add(&a, &key))));
    c.bench_function("distance_2k", |bench| {
        bench.iter(|| black_box(codec.distance(&a, &key)))
    });
    c.bench_function("fingerprint_2k", |bench| {
        bench.iter(|| black_box(codec.fingerprint(&a)))
    });
}

fn bench_frames(c: &mut Criterion) {
    let blocks = vec![Block::blob("payload", random_bytes(16 * 1024))];
    let meta = Metadata::new();
    let leaf = encode_leaf(&meta, &blocks).unwrap();

    c.bench_function("encode_leaf_16k", |bench| {
        bench.iter(|| black_box(encode_leaf(&meta, &blocks).unwrap()))
    });
    c.bench_function("decode_leaf_16k", |bench| {
        bench.iter(|| black_box(decode_leaf(&leaf).unwrap()))
    });
}

fn bench_superparagraph(c: &mut Criterion) {
    let codec = Codec::glyphmatics();
    let definition = "A measure of disorder or uncertainty in a system.";
    let record = Superparagraph {
        word: "entropy".into(),
        definition: definition.into(),
        glyphs: codec.inner_dialog(definition, Some("GlyphNotes-Inner")),
        ..Default::default()
    };
    let line = encode_superparagraph(&record, "entropy").unwrap();

    c.bench_function("encode_superparagraph", |bench| {
        bench.iter(|| black_box(encode_superparagraph(&record, "entropy").unwrap()))
    });
    c.bench_function("decode_superparagraph", |bench| {
        bench.iter(|| black_box(decode_superparagraph(&line).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_codec,
    bench_algebra,
    bench_frames,
    bench_superparagraph
);
criterion_main!(benches);
