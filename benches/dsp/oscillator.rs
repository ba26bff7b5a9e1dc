//! Benchmarks for band-limited oscillator generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use zynthora::dsp::oscillator::{Oscillator, Waveform};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, waveform) in [
            ("sine", Waveform::Sine),
            ("triangle", Waveform::Triangle),
            ("saw", Waveform::Saw),
            ("square", Waveform::Square),
        ] {
            let mut osc = Oscillator::new(SAMPLE_RATE, waveform);
            osc.set_frequency(440.0);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| osc.render(black_box(&mut buffer)))
            });
        }
    }

    group.finish();
}
