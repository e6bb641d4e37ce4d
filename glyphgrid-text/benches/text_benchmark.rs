use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use glyphgrid_text::sdf::distance_field;
use glyphgrid_text::{
    compile, AtlasBuilder, AtlasConfig, CharacterSet, FontAtlas, FontSpec, GlyphBitmap,
    RasterError, RasterRequest, SdfParams, TextEditor, EditEvent,
};

/// Filled disc, roughly what a round glyph looks like before the SDF pass.
fn disc_coverage(size: u32) -> Vec<u8> {
    let r = size as f32 / 2.0;
    (0..size * size)
        .map(|i| {
            let x = (i % size) as f32 + 0.5 - r;
            let y = (i / size) as f32 + 0.5 - r;
            if x * x + y * y <= r * r {
                255
            } else {
                0
            }
        })
        .collect()
}

fn synthetic_rasterizer(
    ch: char,
    req: &RasterRequest<'_>,
) -> Result<GlyphBitmap, RasterError> {
    let extent = req.max_extent.min(40);
    let field = distance_field(&disc_coverage(extent), extent, extent, &req.sdf);
    Ok(GlyphBitmap::new(field.width, field.height, field.data, ch as i32 % 7))
}

fn latin1_atlas() -> FontAtlas {
    let builder = AtlasBuilder::new(AtlasConfig::default()).unwrap();
    builder
        .build(
            &mut synthetic_rasterizer,
            CharacterSet::latin1().iter(),
            &FontSpec::default(),
        )
        .unwrap()
}

fn bench_distance_field_40(c: &mut Criterion) {
    let coverage = disc_coverage(40);
    let params = SdfParams::default();

    c.bench_function("distance_field_40x40", |b| {
        b.iter(|| distance_field(black_box(&coverage), 40, 40, black_box(&params)));
    });
}

fn bench_atlas_build_latin1(c: &mut Criterion) {
    let builder = AtlasBuilder::new(AtlasConfig::default()).unwrap();
    let charset = CharacterSet::latin1();
    let font = FontSpec::default();

    c.bench_function("atlas_build_latin1", |b| {
        b.iter(|| {
            builder.build(
                &mut synthetic_rasterizer,
                black_box(&charset).iter(),
                black_box(&font),
            )
        });
    });
}

fn bench_compile_sentence(c: &mut Criterion) {
    let atlas = latin1_atlas();

    c.bench_function("compile_sentence", |b| {
        b.iter(|| {
            compile(
                black_box("The quick brown fox jumps over the lazy dog"),
                black_box(32.0),
                &atlas.layout,
            )
        });
    });
}

fn bench_compile_paragraph(c: &mut Criterion) {
    let atlas = latin1_atlas();
    let paragraph = "The quick brown fox jumps over the lazy dog. \
        Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
        Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";

    c.bench_function("compile_paragraph", |b| {
        b.iter(|| compile(black_box(paragraph), black_box(14.0), &atlas.layout));
    });
}

fn bench_editor_typing(c: &mut Criterion) {
    c.bench_function("editor_type_and_erase", |b| {
        b.iter(|| {
            let mut editor = TextEditor::new("The quick brown fox");
            editor.apply(EditEvent::End);
            for ch in "jumps over".chars() {
                editor.apply(EditEvent::Insert(ch.to_string()));
            }
            for _ in 0..10 {
                editor.apply(EditEvent::Backspace);
            }
            black_box(editor.cursor())
        });
    });
}

criterion_group!(
    benches,
    bench_distance_field_40,
    bench_atlas_build_latin1,
    bench_compile_sentence,
    bench_compile_paragraph,
    bench_editor_typing,
);
criterion_main!(benches);
