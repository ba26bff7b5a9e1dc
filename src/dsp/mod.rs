//! Low-level DSP primitives used by the sound sources and effect stages.
//!
//! These components allocate only in their constructors and are realtime-safe
//! afterwards, making them safe to embed directly inside render-owned state.
//! They stay focused on the signal-processing math; parameter routing and
//! bypass logic live one layer up.

/// Circular delay line with fractional reads.
pub mod delay;
/// Waveshaping transfer functions.
pub mod distortion;
/// Gate-driven attack/decay/sustain/release envelope.
pub mod envelope;
/// Resonant state-variable low-pass.
pub mod filter;
/// Sub-audio oscillators for modulation.
pub mod lfo;
/// Band-limited oscillator waveforms.
pub mod oscillator;
/// Comb/allpass reverberation network.
pub mod reverb;

pub use envelope::EnvelopeStage;

/// Replace NaN and infinities with silence.
#[inline]
pub fn sanitize(sample: f32) -> f32 {
    if sample.is_finite() {
        sample
    } else {
        0.0
    }
}
