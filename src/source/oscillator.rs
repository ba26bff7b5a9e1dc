use crate::dsp::oscillator::{Oscillator, Waveform};
use crate::event::{as_toggle, Param, SourceSelect};
use crate::source::SoundSource;

/*
Basic oscillator with optional linear FM
========================================

With custom FM enabled a second oscillator at `base * ratio` bends the
carrier's instantaneous frequency every sample:

    f(t) = base + modulator(t) * index * base

Linear (not exponential) FM keeps the carrier's average pitch at `base`
even for deep modulation; indices above 1 push the instantaneous frequency
through zero, which the oscillator handles by running backwards.
*/

pub const MAX_FM_RATIO: f32 = 32.0;
pub const MAX_FM_INDEX: f32 = 16.0;

pub struct OscillatorSource {
    carrier: Oscillator,
    modulator: Oscillator,
    base_frequency: f32,
    ratio: f32,
    index: f32,
    custom_fm: bool,
}

impl OscillatorSource {
    pub fn new(sample_rate: f32) -> Self {
        let mut source = Self {
            carrier: Oscillator::new(sample_rate, Waveform::Sine),
            modulator: Oscillator::new(sample_rate, Waveform::Sine),
            base_frequency: 440.0,
            ratio: 2.0,
            index: 1.0,
            custom_fm: false,
        };
        source.set_frequency(440.0);
        source
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.carrier.set_waveform(waveform);
    }

    pub fn waveform(&self) -> Waveform {
        self.carrier.waveform()
    }

    pub fn custom_fm(&self) -> bool {
        self.custom_fm
    }
}

impl SoundSource for OscillatorSource {
    fn init(&mut self, sample_rate: f32) {
        let waveform = self.carrier.waveform();
        let mod_waveform = self.modulator.waveform();
        self.carrier = Oscillator::new(sample_rate, waveform);
        self.modulator = Oscillator::new(sample_rate, mod_waveform);
        self.set_frequency(self.base_frequency);
    }

    fn set_frequency(&mut self, frequency: f32) {
        if !frequency.is_finite() || frequency <= 0.0 {
            return;
        }
        self.base_frequency = frequency;
        self.carrier.set_frequency(frequency);
        self.modulator.set_frequency(frequency * self.ratio);
    }

    fn set_param(&mut self, param: Param, value: f32) {
        if !value.is_finite() {
            return;
        }
        match param {
            Param::FmRatio => {
                self.ratio = value.clamp(0.0, MAX_FM_RATIO);
                self.modulator.set_frequency(self.base_frequency * self.ratio);
            }
            Param::FmIndex => self.index = value.clamp(0.0, MAX_FM_INDEX),
            Param::CustomFmEnable => {
                self.custom_fm = as_toggle(value);
                if !self.custom_fm {
                    self.carrier.set_frequency(self.base_frequency);
                }
            }
            Param::ModWave => {
                if let Some(SourceSelect::Oscillator(waveform)) = SourceSelect::from_wire(value) {
                    self.modulator.set_waveform(waveform);
                }
            }
            _ => {}
        }
    }

    #[inline]
    fn next_sample(&mut self) -> f32 {
        if self.custom_fm {
            let modulation = self.modulator.next_sample() * self.index * self.base_frequency;
            self.carrier.set_frequency(self.base_frequency + modulation);
        }
        self.carrier.next_sample()
    }

    fn reset(&mut self) {
        self.carrier.reset();
        self.modulator.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_selected_waveform() {
        let mut source = OscillatorSource::new(48_000.0);
        source.set_waveform(Waveform::Square);
        source.set_frequency(100.0);
        let samples: Vec<f32> = (0..480).map(|_| source.next_sample()).collect();
        assert!(samples[100] > 0.9);
        assert!(samples[340] < -0.9);
    }

    #[test]
    fn custom_fm_changes_the_signal() {
        let mut plain = OscillatorSource::new(48_000.0);
        let mut modulated = OscillatorSource::new(48_000.0);
        modulated.set_param(Param::CustomFmEnable, 1.0);
        modulated.set_param(Param::FmIndex, 2.0);

        let difference: f32 = (0..4_800)
            .map(|_| (plain.next_sample() - modulated.next_sample()).abs())
            .sum();
        assert!(difference > 1.0);
    }

    #[test]
    fn disabling_custom_fm_restores_base_pitch() {
        let mut source = OscillatorSource::new(48_000.0);
        source.set_param(Param::CustomFmEnable, 1.0);
        for _ in 0..100 {
            source.next_sample();
        }
        source.set_param(Param::CustomFmEnable, 0.0);
        assert!(!source.custom_fm());
        assert_eq!(source.carrier.frequency(), 440.0);
    }

    #[test]
    fn modulator_waveform_uses_selector_codes() {
        let mut source = OscillatorSource::new(48_000.0);
        source.set_param(Param::ModWave, 6.0);
        assert_eq!(source.modulator.waveform(), Waveform::Saw);
        source.set_param(Param::ModWave, 101.0);
        assert_eq!(source.modulator.waveform(), Waveform::Saw);
    }
}
