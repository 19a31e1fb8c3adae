//! Benchmarks for histmatch operations.
//!
//! Run with: `cargo bench`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use histmatch_core::{Clip, Frame, FrameFormat, Plane};
use histmatch_curve::{estimate, Curve, EstimateOptions, JointHistogram};
use histmatch_ops::{process_clip, MatchHistogram, MatchParams};

fn noise_plane(width: u32, height: u32, seed: u32) -> Plane {
    let mut state = seed.wrapping_mul(2_654_435_761).max(1);
    let data = (0..width * height)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect();
    Plane::from_data(width, height, data).expect("plane")
}

/// Benchmark joint histogram accumulation.
fn bench_accumulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("accumulate");

    for &(w, h) in &[(640u32, 480u32), (1920, 1080)] {
        let src = noise_plane(w, h, 1);
        let reference = noise_plane(w, h, 2);
        group.throughput(Throughput::Elements(w as u64 * h as u64));
        group.bench_with_input(BenchmarkId::from_parameter(format!("{}x{}", w, h)), &(src, reference), |b, (s, r)| {
            b.iter(|| JointHistogram::accumulate(black_box(&s.view()), black_box(&r.view())).expect("accumulate"))
        });
    }

    group.finish();
}

/// Benchmark curve estimation from a sparse histogram.
fn bench_estimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate");

    let src = Plane::from_data(4, 1, vec![60, 61, 120, 180]).expect("plane");
    let reference = Plane::from_data(4, 1, vec![30, 40, 100, 200]).expect("plane");
    let hist = JointHistogram::accumulate(&src.view(), &reference.view()).expect("accumulate");

    for radius in [0usize, 8, 32] {
        let options = EstimateOptions {
            raw: false,
            smoothing_radius: radius,
        };
        group.bench_with_input(BenchmarkId::new("sparse", radius), &options, |b, o| {
            b.iter(|| estimate(black_box(&hist), o))
        });
    }

    group.finish();
}

/// Benchmark lookup application.
fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply");
    let curve = Curve::from_fn(|v| 255 - v);
    let mut plane = noise_plane(1920, 1080, 3);

    group.throughput(Throughput::Elements(1920 * 1080));
    group.bench_function("in_place_1080p", |b| {
        b.iter(|| curve.apply_in_place(black_box(&mut plane.view_mut())))
    });

    group.finish();
}

/// Benchmark frame-parallel clip processing.
fn bench_clip(c: &mut Criterion) {
    let mut group = c.benchmark_group("clip");
    group.sample_size(10);

    let frame = |seed| {
        let planes = vec![noise_plane(1280, 720, seed), noise_plane(640, 360, seed + 1), noise_plane(640, 360, seed + 2)];
        Frame::from_planes(FrameFormat::YUV420P8, 1280, 720, planes).expect("frame")
    };
    let source = Clip::new((0..8).map(|i| frame(10 + i * 3)).collect());
    let reference = Clip::new((0..8).map(|i| frame(100 + i * 3)).collect());

    let params = MatchParams {
        planes: vec![0, 1, 2],
        ..MatchParams::default()
    };
    let filter = MatchHistogram::new(&params, &source.info(), &reference.info(), None).expect("filter");

    group.throughput(Throughput::Elements(8));
    group.bench_function("yuv420_720p_x8", |b| {
        b.iter(|| process_clip(&filter, black_box(&source), black_box(&reference), None).expect("clip"))
    });

    group.finish();
}

criterion_group!(benches, bench_accumulate, bench_estimate, bench_apply, bench_clip);
criterion_main!(benches);
