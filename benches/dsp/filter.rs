//! Benchmarks for the first-order filters.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use synth_kernel::dsp::filter::{
    FeedForwardFilter, FeedbackFilter, GainFilter, OnePoleLowpass, SampleFilter,
};

use crate::BLOCK_SIZES;

fn bench_one<F: SampleFilter>(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
    name: &str,
    size: usize,
    mut filter: F,
) {
    // Deterministic non-trivial input
    let input: Vec<f64> = (0..size).map(|i| ((i * 7) % 13) as f64 / 13.0 - 0.5).collect();
    let mut buffer = input.clone();

    group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
        b.iter(|| {
            buffer.copy_from_slice(&input);
            filter.render(black_box(&mut buffer));
        })
    });
}

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        bench_one(&mut group, "feed_forward", size, FeedForwardFilter::new(0.5, 0.5));
        bench_one(&mut group, "feedback", size, FeedbackFilter::new(1.0, -0.9));
        bench_one(&mut group, "gain", size, GainFilter::new(0.5, 1.0));
        bench_one(&mut group, "lowpass", size, OnePoleLowpass::new(1000.0, 48_000.0));
    }

    group.finish();
}
