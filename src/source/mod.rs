//! Sound sources and the mux that selects between them.
//!
//! Every variant implements [`SoundSource`]: it is prepared once per render
//! block and then asked for exactly one sample at a time, whatever batching
//! it does internally. The built-in variants live inline in
//! [`SoundSourceMux`]; external macro-oscillator engines plug into two boxed
//! slots.

pub mod fm;
pub mod mux;
pub mod oscillator;
pub mod paraphonic;
pub mod wavetable;

pub use fm::FmPair;
pub use mux::SoundSourceMux;
pub use oscillator::OscillatorSource;
pub use paraphonic::ParaphonicSaw;
pub use wavetable::WavetableSource;

use crate::event::Param;
use crate::synth::VoiceSnapshot;

/// Per-block view handed to sources.
pub struct RenderCtx<'a> {
    pub sample_rate: f32,
    /// Current voice pool, including idle voices.
    pub voices: &'a [VoiceSnapshot],
}

impl<'a> RenderCtx<'a> {
    pub fn new(sample_rate: f32, voices: &'a [VoiceSnapshot]) -> Self {
        Self {
            sample_rate,
            voices,
        }
    }
}

/// Capability contract shared by all sound-source variants.
///
/// Implementations must not allocate, lock or block in any method other than
/// [`SoundSource::init`].
pub trait SoundSource: Send {
    /// Called once before rendering, and again if the sample rate changes.
    fn init(&mut self, sample_rate: f32);

    /// Target pitch for monophonic variants.
    fn set_frequency(&mut self, frequency: f32);

    /// Auxiliary parameter update.
    ///
    /// Default implementation ignores every parameter.
    fn set_param(&mut self, _param: Param, _value: f32) {}

    /// A note started.
    ///
    /// Default implementation does nothing (free-running sources).
    fn trigger(&mut self) {}

    /// Called at the start of every render block.
    fn prepare(&mut self, _ctx: &RenderCtx<'_>) {}

    /// Produce one sample.
    fn next_sample(&mut self) -> f32;

    /// Return to the freshly initialised phase state.
    fn reset(&mut self) {}
}

impl<S: SoundSource + ?Sized> SoundSource for Box<S> {
    fn init(&mut self, sample_rate: f32) {
        (**self).init(sample_rate)
    }

    fn set_frequency(&mut self, frequency: f32) {
        (**self).set_frequency(frequency)
    }

    fn set_param(&mut self, param: Param, value: f32) {
        (**self).set_param(param, value)
    }

    fn trigger(&mut self) {
        (**self).trigger()
    }

    fn prepare(&mut self, ctx: &RenderCtx<'_>) {
        (**self).prepare(ctx)
    }

    fn next_sample(&mut self) -> f32 {
        (**self).next_sample()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}
