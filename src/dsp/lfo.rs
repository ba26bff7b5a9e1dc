//! Low frequency oscillators for modulation.

/*
An LFO is an oscillator running at control rate (roughly 0.01 - 20 Hz).
The chorus uses one to sweep its delay time:

    0.1 - 0.5 Hz   slow, wide ensemble
    0.5 - 2 Hz     classic chorus
    2 - 7 Hz       vibrato territory

Output is bipolar (-1.0 to +1.0). Convert with

    unipolar = (bipolar + 1.0) * 0.5

when a parameter should only move in one direction.
*/

use std::f32::consts::TAU;

pub const MIN_RATE_HZ: f32 = 0.01;
pub const MAX_RATE_HZ: f32 = 20.0;

/// Free-running sine LFO.
pub struct Lfo {
    phase: f32,
    increment: f32,
    rate_hz: f32,
    sample_rate: f32,
}

impl Lfo {
    pub fn new(sample_rate: f32, rate_hz: f32) -> Self {
        let mut lfo = Self {
            phase: 0.0,
            increment: 0.0,
            rate_hz: MIN_RATE_HZ,
            sample_rate,
        };
        lfo.set_rate(rate_hz);
        lfo
    }

    pub fn set_rate(&mut self, rate_hz: f32) {
        if !rate_hz.is_finite() {
            return;
        }
        self.rate_hz = rate_hz.clamp(MIN_RATE_HZ, MAX_RATE_HZ);
        self.increment = self.rate_hz / self.sample_rate;
    }

    pub fn rate(&self) -> f32 {
        self.rate_hz
    }

    /// Current bipolar value, then advance one sample.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let value = (self.phase * TAU).sin();
        self.phase += self.increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        value
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// Convert bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

/// Samples in one cycle at the given rate.
#[inline]
pub fn samples_per_period(frequency_hz: f32, sample_rate: f32) -> f32 {
    sample_rate / frequency_hz
}
