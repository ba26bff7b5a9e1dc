//! Benchmarks for the event channel, sound sources and full engine blocks.

mod channel;
mod engine;
mod sources;

pub use channel::bench_channel;
pub use engine::bench_engine;
pub use sources::bench_sources;
