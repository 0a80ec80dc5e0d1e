use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gl_wrapper::geometry::{VertexAttribute, VertexLayout};

use gles2_samples::samples::{TRIANGLE, TRIANGLE_COLORS};
use gles2_samples::ScreenTransform;

pub fn interleave(c: &mut Criterion) {
    let layout = VertexLayout::builder()
        .with_attribute("aPosition", VertexAttribute::Vec2)
        .with_attribute("aColor", VertexAttribute::Vec3)
        .build()
        .unwrap();

    let positions: Vec<f32> = TRIANGLE.iter().copied().cycle().take(2 * 3000).collect();
    let colors: Vec<f32> = TRIANGLE_COLORS.iter().copied().cycle().take(3 * 3000).collect();

    c.bench_function("interleave 3000 vertices", |b| {
        b.iter(|| layout.interleave(black_box(&[&positions[..], &colors[..]])).unwrap())
    });

    let interleaved = layout.interleave(&[&positions[..], &colors[..]]).unwrap();
    c.bench_function("deinterleave 3000 vertices", |b| {
        b.iter(|| layout.deinterleave(black_box(&interleaved)).unwrap())
    });
}

pub fn screen_transform(c: &mut Criterion) {
    c.bench_function("screen transform", |b| {
        b.iter(|| ScreenTransform::new(black_box(1920), black_box(1080)).to_columns())
    });
}

criterion_group!(benches, interleave, screen_transform);
criterion_main!(benches);
