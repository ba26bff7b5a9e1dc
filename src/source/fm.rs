use std::f32::consts::TAU;

use crate::event::Param;
use crate::source::oscillator::{MAX_FM_INDEX, MAX_FM_RATIO};
use crate::source::SoundSource;

/// Two-operator phase-modulation pair: a sine modulator at
/// `frequency * ratio` offsets the phase of a sine carrier by `index` cycles.
pub struct FmPair {
    carrier_phase: f32,
    modulator_phase: f32,
    frequency: f32,
    ratio: f32,
    index: f32,
    sample_rate: f32,
}

impl FmPair {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            carrier_phase: 0.0,
            modulator_phase: 0.0,
            frequency: 440.0,
            ratio: 2.0,
            index: 1.0,
            sample_rate,
        }
    }

    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    pub fn index(&self) -> f32 {
        self.index
    }
}

#[inline]
fn advance(phase: &mut f32, increment: f32) {
    *phase += increment;
    *phase -= phase.floor();
}

impl SoundSource for FmPair {
    fn init(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.reset();
    }

    fn set_frequency(&mut self, frequency: f32) {
        if frequency.is_finite() && frequency > 0.0 {
            self.frequency = frequency.min(self.sample_rate * 0.5);
        }
    }

    fn set_param(&mut self, param: Param, value: f32) {
        if !value.is_finite() {
            return;
        }
        match param {
            Param::FmRatio => self.ratio = value.clamp(0.0, MAX_FM_RATIO),
            Param::FmIndex => self.index = value.clamp(0.0, MAX_FM_INDEX),
            _ => {}
        }
    }

    #[inline]
    fn next_sample(&mut self) -> f32 {
        let modulator = (self.modulator_phase * TAU).sin();
        let output = ((self.carrier_phase + modulator * self.index) * TAU).sin();

        let increment = self.frequency / self.sample_rate;
        advance(&mut self.carrier_phase, increment);
        advance(&mut self.modulator_phase, increment * self.ratio);
        output
    }

    fn reset(&mut self) {
        self.carrier_phase = 0.0;
        self.modulator_phase = 0.0;
    }
}
