//! Benchmarks for the Schroeder reverb.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use zynthora::dsp::reverb::SchroederReverb;
use zynthora::effects::reverb::StereoReverb;
use zynthora::effects::StereoFrame;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/reverb");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| {
                if i < 10 {
                    1.0 - (i as f32 / 10.0)
                } else {
                    (i as f32 * 0.05).sin() * 0.1
                }
            })
            .collect();

        let mut reverb = SchroederReverb::new(SAMPLE_RATE, 0);
        reverb.set_feedback(0.85);
        reverb.set_tone(10_000.0);
        group.bench_with_input(BenchmarkId::new("mono", size), &size, |b, _| {
            b.iter(|| {
                for x in &input {
                    black_box(reverb.process(*x));
                }
            })
        });

        let mut reverb = StereoReverb::new(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("stereo", size), &size, |b, _| {
            b.iter(|| {
                for x in &input {
                    black_box(reverb.process(StereoFrame::mono(*x)));
                }
            })
        });
    }

    group.finish();
}
