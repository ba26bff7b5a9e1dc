//! Benchmarks for the gate-driven ADSR.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use zynthora::dsp::envelope::Envelope;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let mut env = Envelope::adsr(SAMPLE_RATE, 0.01, 0.1, 0.7, 0.3);
        group.bench_with_input(BenchmarkId::new("held", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = env.process(black_box(true));
                }
            })
        });

        // gate flips every block: attack and release segments
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.001, 0.01, 0.5, 0.005);
        let mut gate = false;
        group.bench_with_input(BenchmarkId::new("retrigger", size), &size, |b, _| {
            b.iter(|| {
                gate = !gate;
                for sample in buffer.iter_mut() {
                    *sample = env.process(black_box(gate));
                }
            })
        });
    }

    group.finish();
}
