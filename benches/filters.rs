// benches/filters.rs -- Per-kernel benchmarks for the CPU path.
//
//   cargo bench
//
// Covers the two real filters, the affine warp, and the software quad
// rasterizer at the default capture resolution.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use quadcam::filters::{pixelate, sin_city, PIXELATE_BLOCK};
use quadcam::render::rasterize_quad;
use quadcam::transform::{warp_affine, TransformState};
use quadcam::types::{pack, Frame, FilterKind};

/// Synthetic camera-like frame: gradients plus a few red patches so the
/// SinCity classifier takes both branches.
fn make_scene(w: usize, h: usize) -> Frame {
    let mut f = Frame::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let r = ((x * 255) / w) as u32;
            let g = ((y * 255) / h) as u32;
            let b = (((x + y) * 255) / (w + h)) as u32;
            let px = if (x / 40 + y / 40) % 7 == 0 { pack(220, 40, 40) } else { pack(r, g, b) };
            f.set(x, y, px);
        }
    }
    f
}

fn bench_filters(c: &mut Criterion) {
    let frame = make_scene(640, 480);

    let mut group = c.benchmark_group("filters_640x480");
    group.bench_function("pixelate", |b| b.iter(|| pixelate(&frame, PIXELATE_BLOCK)));
    group.bench_function("sincity", |b| b.iter(|| sin_city(&frame)));
    group.finish();
}

fn bench_warp(c: &mut Criterion) {
    let frame = make_scene(640, 480);
    let t = TransformState { translate_x: 0.25, translate_y: 0.15, rotate_deg: 30.0, scale: 1.5 };

    let mut group = c.benchmark_group("warp_640x480");
    group.bench_function("warp_affine", |b| b.iter(|| warp_affine(&frame, &t)));
    for program in [FilterKind::None, FilterKind::Pixelate, FilterKind::SinCity] {
        group.bench_with_input(
            BenchmarkId::new("rasterize_quad", program.name()),
            &program,
            |b, &program| {
                let mut out = Frame::new(640, 480);
                b.iter(|| rasterize_quad(&frame, &t, program, &mut out));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_filters, bench_warp);
criterion_main!(benches);
