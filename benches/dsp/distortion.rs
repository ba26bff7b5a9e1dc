//! Benchmarks for the waveshapers.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use zynthora::dsp::distortion::{drive_gain, soft_clip};

use crate::BLOCK_SIZES;

pub fn bench_distortion(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/distortion");
    let drive = drive_gain(0.6);

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin()).collect();
        let mut buffer = input.clone();

        group.bench_with_input(BenchmarkId::new("soft_clip", size), &size, |b, _| {
            b.iter(|| {
                for (out, x) in buffer.iter_mut().zip(&input) {
                    *out = soft_clip(black_box(*x), drive);
                }
            })
        });
    }

    group.finish();
}
