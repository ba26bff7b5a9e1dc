//! Benchmarks for the state-variable low-pass.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use zynthora::dsp::filter::SVFilter;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // sawtooth-like ramp
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        let mut filter = SVFilter::lowpass(SAMPLE_RATE, 1000.0);
        filter.set_resonance(0.5);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer));
            })
        });

        // cutoff modulated every sample, as the envelope filter does
        let mut filter = SVFilter::lowpass(SAMPLE_RATE, 1000.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("modulated", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                for (i, sample) in buffer.iter_mut().enumerate() {
                    filter.set_cutoff(500.0 + i as f32 * 10.0);
                    *sample = filter.process(black_box(*sample));
                }
            })
        });
    }

    group.finish();
}
