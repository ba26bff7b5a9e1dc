//! Per-sample cost of each built-in sound source.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use zynthora::dsp::oscillator::Waveform;
use zynthora::event::{Param, SourceSelect};
use zynthora::source::{RenderCtx, SoundSourceMux};
use zynthora::synth::VoiceAllocator;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_sources(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/sources");

    // a held chord so the paraphonic source has four voices to mix
    let mut voices: VoiceAllocator = VoiceAllocator::new();
    for note in [48, 55, 60, 64] {
        voices.note_on(note, 100);
    }
    let snapshot = voices.snapshot(0.4);
    let ctx = RenderCtx::new(SAMPLE_RATE, &snapshot);

    let sources = [
        ("saw", SourceSelect::Oscillator(Waveform::Saw)),
        ("fm", SourceSelect::Fm),
        ("wavetable", SourceSelect::Wavetable),
        ("paraphonic", SourceSelect::Paraphonic),
    ];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, select) in sources {
            let mut mux = SoundSourceMux::new(SAMPLE_RATE);
            mux.select(select);
            mux.set_frequency(220.0);
            mux.set_param(Param::WavetableMorph, 31.5);
            mux.trigger();

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    mux.prepare(black_box(&ctx));
                    for sample in buffer.iter_mut() {
                        *sample = mux.next_sample();
                    }
                })
            });
        }

        let mut mux = SoundSourceMux::new(SAMPLE_RATE);
        mux.set_param(Param::CustomFmEnable, 1.0);
        mux.set_param(Param::FmIndex, 4.0);
        mux.set_frequency(220.0);
        group.bench_with_input(BenchmarkId::new("custom_fm", size), &size, |b, _| {
            b.iter(|| {
                mux.prepare(black_box(&ctx));
                for sample in buffer.iter_mut() {
                    *sample = mux.next_sample();
                }
            })
        });
    }

    group.finish();
}
