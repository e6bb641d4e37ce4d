//! Benchmarks for glyphgrid-render vertex packing and atlas preparation.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glyphgrid_render::bridge::build_vertices;
use glyphgrid_render::texture::AtlasTexture;
use glyphgrid_render::viewport::{Viewport, ViewportEvent};
use glyphgrid_text::{
    caret_quad, compile, AtlasBuilder, AtlasConfig, CharacterSet, FontAtlas, FontSpec,
    GlyphBitmap, RasterError, RasterRequest,
};

fn filled_atlas() -> FontAtlas {
    let builder = AtlasBuilder::new(AtlasConfig::default()).unwrap();
    let mut raster = |ch: char, req: &RasterRequest<'_>| -> Result<GlyphBitmap, RasterError> {
        let side = req.max_extent;
        let value = (ch as u32 % 251) as u8;
        Ok(GlyphBitmap::new(side, side, vec![value; (side * side) as usize], 0))
    };
    builder
        .build(&mut raster, CharacterSet::latin1().iter(), &FontSpec::default())
        .unwrap()
}

fn make_text(n: usize) -> String {
    "The quick brown fox jumps over the lazy dog. "
        .chars()
        .cycle()
        .take(n)
        .collect()
}

fn bench_build_vertices(c: &mut Criterion) {
    let atlas = filled_atlas();
    let mut group = c.benchmark_group("build_vertices");
    for &count in &[100, 1_000, 10_000] {
        let text = make_text(count);
        let run = compile(&text, 32.0, &atlas.layout).unwrap();
        let caret = caret_quad(count, count / 2, 32.0, 0.5).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(count), &run, |b, run| {
            b.iter(|| black_box(build_vertices(black_box(run), Some(&caret))));
        });
    }
    group.finish();
}

fn bench_atlas_texture_1024(c: &mut Criterion) {
    let atlas = filled_atlas();

    c.bench_function("AtlasTexture::from_bitmap_1024", |b| {
        b.iter(|| black_box(AtlasTexture::from_bitmap(black_box(&atlas.bitmap))));
    });
}

fn bench_viewport_camera(c: &mut Criterion) {
    let mut viewport = Viewport::new();
    viewport.apply(ViewportEvent::Zoom(0.5));
    viewport.apply(ViewportEvent::Pan { dx: 120.0, dy: -40.0 });

    c.bench_function("Viewport::camera", |b| {
        b.iter(|| black_box(black_box(&viewport).camera(black_box(1920.0), black_box(1080.0))));
    });
}

fn bench_bytemuck_cast(c: &mut Criterion) {
    let atlas = filled_atlas();
    let run = compile(&make_text(1_000), 32.0, &atlas.layout).unwrap();
    let vertices = build_vertices(&run, None);

    c.bench_function("bytemuck_cast_1k_glyphs", |b| {
        b.iter(|| {
            let bytes: &[u8] = bytemuck::cast_slice(black_box(&vertices));
            black_box(bytes.len());
        });
    });
}

criterion_group!(
    benches,
    bench_build_vertices,
    bench_atlas_texture_1024,
    bench_viewport_camera,
    bench_bytemuck_cast,
);
criterion_main!(benches);
