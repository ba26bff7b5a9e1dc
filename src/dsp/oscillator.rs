use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Band-limited oscillator
=======================

The oscillator keeps a normalized phase in [0, 1) and advances it by
`increment = frequency / sample_rate` each sample.

Naive saw and square waves jump instantly, which aliases badly. PolyBLEP
subtracts a two-sample polynomial residual around every discontinuity:

    t < dt        residual = 2u - u^2 - 1          (u = t / dt)
    t > 1 - dt    residual = u^2 + 2u + 1          (u = (t - 1) / dt)

  saw     2t - 1 - blep(t)
  square  +/-1 + blep(t) - blep(t + 0.5)
  tri     4|t - 0.5| - 1, harmonics already fall off at 1/n^2
  sine    sin(2 pi t)

Negative frequencies (deep linear FM) run the phase backwards; the wrap
handles both directions.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Triangle,
    Saw,
    Square,
}

/// Convert a (possibly fractional) MIDI note number to Hz.
#[inline]
pub fn midi_to_freq(note: f32) -> f32 {
    440.0 * 2.0_f32.powf((note - 69.0) / 12.0)
}

/// PolyBLEP residual for a discontinuity at phase 0.
#[inline]
pub fn poly_blep(t: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        0.0
    } else if t < dt {
        let u = t / dt;
        u + u - u * u - 1.0
    } else if t > 1.0 - dt {
        let u = (t - 1.0) / dt;
        u * u + u + u + 1.0
    } else {
        0.0
    }
}

#[inline]
fn wrap(phase: f32) -> f32 {
    let wrapped = phase - phase.floor();
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

/// Evaluate a waveform at phase `t` with phase increment `dt`.
#[inline]
pub fn waveform_at(waveform: Waveform, t: f32, dt: f32) -> f32 {
    let dt = dt.abs().min(0.5);
    match waveform {
        Waveform::Sine => (t * TAU).sin(),
        Waveform::Triangle => 1.0 - 4.0 * (t - 0.5).abs(),
        Waveform::Saw => 2.0 * t - 1.0 - poly_blep(t, dt),
        Waveform::Square => {
            let naive = if t < 0.5 { 1.0 } else { -1.0 };
            naive + poly_blep(t, dt) - poly_blep(wrap(t + 0.5), dt)
        }
    }
}

pub struct Oscillator {
    waveform: Waveform,
    phase: f32,
    increment: f32,
    frequency: f32,
    sample_rate: f32,
}

impl Oscillator {
    pub fn new(sample_rate: f32, waveform: Waveform) -> Self {
        let mut osc = Self {
            waveform,
            phase: 0.0,
            increment: 0.0,
            frequency: 0.0,
            sample_rate,
        };
        osc.set_frequency(440.0);
        osc
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        if !frequency.is_finite() {
            return;
        }
        let nyquist = self.sample_rate * 0.5;
        self.frequency = frequency.clamp(-nyquist, nyquist);
        self.increment = self.frequency / self.sample_rate;
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Current output, then advance one sample.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let value = waveform_at(self.waveform, self.phase, self.increment);
        self.phase = wrap(self.phase + self.increment);
        value
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn midi_to_freq_matches_reference_pitches() {
        assert!((midi_to_freq(69.0) - 440.0).abs() < 1e-3);
        assert!((midi_to_freq(81.0) - 880.0).abs() < 1e-2);
        assert!((midi_to_freq(60.0) - 261.626).abs() < 1e-2);
    }

    #[test]
    fn every_waveform_stays_in_range() {
        for waveform in [Waveform::Sine, Waveform::Triangle, Waveform::Saw, Waveform::Square] {
            let mut osc = Oscillator::new(SAMPLE_RATE, waveform);
            osc.set_frequency(1_234.5);
            let mut buffer = vec![0.0; 4_800];
            osc.render(&mut buffer);
            assert!(
                buffer.iter().all(|s| s.is_finite() && s.abs() <= 1.1),
                "{waveform:?} out of range"
            );
        }
    }

    #[test]
    fn sine_starts_at_zero_and_peaks_at_quarter_period() {
        let mut osc = Oscillator::new(SAMPLE_RATE, Waveform::Sine);
        osc.set_frequency(1_000.0);
        let buffer: Vec<f32> = (0..48).map(|_| osc.next_sample()).collect();
        assert!(buffer[0].abs() < 1e-6);
        assert!((buffer[12] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn negative_frequency_runs_phase_backwards() {
        let mut osc = Oscillator::new(SAMPLE_RATE, Waveform::Saw);
        osc.set_frequency(-2_000.0);
        for _ in 0..1_000 {
            let sample = osc.next_sample();
            assert!(sample.is_finite());
            assert!((0.0..1.0).contains(&osc.phase()));
        }
    }

    #[test]
    fn saw_is_zero_mean_over_a_period() {
        let mut osc = Oscillator::new(SAMPLE_RATE, Waveform::Saw);
        osc.set_frequency(480.0);
        let sum: f32 = (0..100).map(|_| osc.next_sample()).sum();
        assert!((sum / 100.0).abs() < 0.02);
    }

    #[test]
    fn poly_blep_is_zero_away_from_edges() {
        assert_eq!(poly_blep(0.5, 0.01), 0.0);
        assert!(poly_blep(0.0, 0.01) < 0.0);
        assert!(poly_blep(0.999, 0.01) > 0.0);
    }
}
