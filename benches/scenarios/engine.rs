//! Whole engine blocks: event drain, source, envelope and effect chain.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use zynthora::event::{self, Event, EventProducer, Param, SourceSelect};
use zynthora::{Engine, EngineConfig};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn engine() -> (EventProducer, Engine) {
    let config = EngineConfig::default().sample_rate(SAMPLE_RATE);
    let (tx, rx) = event::channel(config.event_capacity).unwrap();
    (tx, Engine::new(config, rx).unwrap())
}

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        let mut out = vec![0.0f32; size * 2];

        // one held note through the default filter and master stages
        let (mut tx, mut lead) = engine();
        tx.push(Event::param(Param::OscWave, 6.0));
        tx.push(Event::note_on(57, 100));
        group.bench_with_input(BenchmarkId::new("lead", size), &size, |b, _| {
            b.iter(|| lead.render(black_box(&mut out), 2))
        });

        // paraphonic chord with every effect stage enabled
        let (mut tx, mut full) = engine();
        tx.push(Event::param(Param::OscWave, SourceSelect::Paraphonic.to_wire()));
        tx.push(Event::param(Param::ParaDetune, 0.5));
        for param in [
            Param::DriveEnable,
            Param::ChorusEnable,
            Param::DelayEnable,
            Param::ReverbEnable,
        ] {
            tx.push(Event::param(param, 1.0));
        }
        for note in [48, 55, 60, 64] {
            tx.push(Event::note_on(note, 100));
        }
        group.bench_with_input(BenchmarkId::new("full_chain", size), &size, |b, _| {
            b.iter(|| full.render(black_box(&mut out), 2))
        });

        // every block also drains a burst of parameter automation
        let (mut tx, mut automated) = engine();
        tx.push(Event::note_on(60, 100));
        group.bench_with_input(BenchmarkId::new("automation", size), &size, |b, _| {
            let mut cutoff = 200.0;
            b.iter(|| {
                for _ in 0..32 {
                    cutoff = if cutoff > 8_000.0 { 200.0 } else { cutoff * 1.01 };
                    tx.push(Event::param(Param::FilterCutoff, cutoff));
                }
                automated.render(black_box(&mut out), 2);
            })
        });
    }

    group.finish();
}
