//! Push/pop throughput of the SPSC event channel.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput};
use zynthora::event::{self, Event, Param};

pub fn bench_channel(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/channel");

    for &burst in &[1usize, 16, 256] {
        let (mut tx, mut rx) = event::channel(512).unwrap();
        let event = Event::param(Param::FilterCutoff, 1200.0);

        group.throughput(Throughput::Elements(burst as u64));
        group.bench_with_input(BenchmarkId::new("push_pop", burst), &burst, |b, &burst| {
            b.iter(|| {
                for _ in 0..burst {
                    tx.push(black_box(event));
                }
                while let Some(event) = rx.pop() {
                    black_box(event);
                }
            })
        });
    }

    let event = Event::note_on(60, 100);
    group.throughput(Throughput::Elements(1));
    group.bench_function("wire_codec", |b| {
        b.iter(|| Event::from_bytes(&black_box(event).to_bytes()))
    });

    group.finish();
}
