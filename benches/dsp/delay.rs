//! Benchmarks for the delay line and the stereo echo.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use zynthora::dsp::delay::DelayLine;
use zynthora::effects::delay::StereoDelay;
use zynthora::effects::StereoFrame;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.01).sin()).collect();

        let mut line = DelayLine::new(SAMPLE_RATE as usize);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("line", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                line.render(black_box(&mut buffer), 12_000);
            })
        });

        let mut line = DelayLine::new(4_800);
        group.bench_with_input(BenchmarkId::new("interpolated", size), &size, |b, _| {
            b.iter(|| {
                for (i, x) in input.iter().enumerate() {
                    line.write(*x);
                    black_box(line.read_interpolated(960.0 + i as f32 * 0.37));
                }
            })
        });

        let mut echo = StereoDelay::new(SAMPLE_RATE);
        echo.set_feedback(0.6);
        group.bench_with_input(BenchmarkId::new("stereo", size), &size, |b, _| {
            b.iter(|| {
                for x in &input {
                    black_box(echo.process(StereoFrame::mono(*x)));
                }
            })
        });
    }

    group.finish();
}
