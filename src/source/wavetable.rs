use std::sync::OnceLock;

use crate::event::Param;
use crate::source::SoundSource;

/*
Morphing wavetable
==================

A bank of 64 single-cycle frames, 2048 samples each. Reading is bilinear:
linear between neighbouring samples inside a frame, then linear between
the two frames either side of the morph position.

The bank is synthesized once per process. Frame `f` uses t = f / 63:

  harmonics   1 + floor(30t + 20 sin(pi t))
  even decay  even partials scaled by 1 - sin(pi t)  (square-ish middle)
  formant     partial k sits at k * (1 + 0.5t)
  warp        out = 0.4 * sin(p + sin(2p) * 2.5t sin(pi t) + 0.2 * additive)
*/

pub const FRAME_COUNT: usize = 64;
pub const FRAME_LEN: usize = 2048;

type Frame = [f32; FRAME_LEN];

static BANK: OnceLock<Box<[Frame]>> = OnceLock::new();

/// The shared wavetable bank, built on first use.
pub fn bank() -> &'static [Frame] {
    BANK.get_or_init(build_bank)
}

fn build_bank() -> Box<[Frame]> {
    (0..FRAME_COUNT).map(build_frame).collect()
}

fn build_frame(frame: usize) -> Frame {
    let t = frame as f64 / (FRAME_COUNT - 1) as f64;
    let bulge = (t * std::f64::consts::PI).sin();
    let harmonics = 1 + (t * 30.0 + bulge * 20.0) as usize;
    let fm_index = t * 2.5 * bulge;
    let formant_shift = 1.0 + t * 0.5;

    let mut out = [0.0f32; FRAME_LEN];
    for (i, sample) in out.iter_mut().enumerate() {
        let phase = i as f64 / FRAME_LEN as f64 * std::f64::consts::TAU;

        let mut additive = 0.0;
        for k in 1..=harmonics {
            let mut amp = 1.0 / k as f64;
            if k % 2 == 0 {
                amp *= 1.0 - bulge;
            }
            additive += amp * (k as f64 * phase * formant_shift).sin();
        }

        let modulation = (phase * 2.0).sin() * fm_index;
        *sample = ((phase + modulation + additive * 0.2).sin() * 0.4) as f32;
    }
    out
}

pub struct WavetableSource {
    bank: &'static [Frame],
    phase: f32,
    increment: f32,
    frequency: f32,
    morph: f32,
    sample_rate: f32,
}

impl WavetableSource {
    pub fn new(sample_rate: f32) -> Self {
        let mut source = Self {
            bank: bank(),
            phase: 0.0,
            increment: 0.0,
            frequency: 440.0,
            morph: 0.0,
            sample_rate,
        };
        source.set_frequency(440.0);
        source
    }

    /// Morph position, 0.0 (first frame) to 63.0 (last frame).
    pub fn set_morph(&mut self, position: f32) {
        if position.is_finite() {
            self.morph = position.clamp(0.0, (FRAME_COUNT - 1) as f32);
        }
    }

    pub fn morph(&self) -> f32 {
        self.morph
    }

    #[inline]
    fn read_frame(frame: &Frame, index: usize, next: usize, frac: f32) -> f32 {
        let a = frame[index];
        a + (frame[next] - a) * frac
    }
}

impl SoundSource for WavetableSource {
    fn init(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.set_frequency(self.frequency);
        self.reset();
    }

    fn set_frequency(&mut self, frequency: f32) {
        if frequency.is_finite() && frequency > 0.0 {
            self.frequency = frequency.min(self.sample_rate * 0.5);
            self.increment = self.frequency / self.sample_rate;
        }
    }

    fn set_param(&mut self, param: Param, value: f32) {
        if param == Param::WavetableMorph {
            self.set_morph(value);
        }
    }

    #[inline]
    fn next_sample(&mut self) -> f32 {
        let position = self.phase * FRAME_LEN as f32;
        let index = (position as usize).min(FRAME_LEN - 1);
        let frac = position - index as f32;
        let next = (index + 1) % FRAME_LEN;

        let frame_a = self.morph as usize;
        let frame_b = (frame_a + 1).min(FRAME_COUNT - 1);
        let blend = self.morph - frame_a as f32;

        let out_a = Self::read_frame(&self.bank[frame_a], index, next, frac);
        let output = if blend > 0.001 {
            let out_b = Self::read_frame(&self.bank[frame_b], index, next, frac);
            out_a + (out_b - out_a) * blend
        } else {
            out_a
        };

        self.phase += self.increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        output
    }

    fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_has_expected_shape() {
        let bank = bank();
        assert_eq!(bank.len(), FRAME_COUNT);
        for frame in bank {
            assert!(frame.iter().all(|s| s.is_finite() && s.abs() <= 0.4 + 1e-6));
        }
        // first frame is a plain warped sine, last frame is brighter
        assert_ne!(bank[0], bank[FRAME_COUNT - 1]);
    }

    #[test]
    fn morph_is_clamped() {
        let mut source = WavetableSource::new(48_000.0);
        source.set_param(Param::WavetableMorph, 99.0);
        assert_eq!(source.morph(), 63.0);
        source.set_param(Param::WavetableMorph, -1.0);
        assert_eq!(source.morph(), 0.0);
        source.set_param(Param::WavetableMorph, f32::NAN);
        assert_eq!(source.morph(), 0.0);
    }

    #[test]
    fn half_morph_blends_neighbouring_frames() {
        let bank = bank();
        let mut source = WavetableSource::new(48_000.0);
        source.set_morph(10.5);
        // phase 0 reads index 0 of frames 10 and 11
        let expected = (bank[10][0] + bank[11][0]) * 0.5;
        assert!((source.next_sample() - expected).abs() < 1e-6);
    }

    #[test]
    fn top_frame_renders_without_overrun() {
        let mut source = WavetableSource::new(48_000.0);
        source.set_morph(63.0);
        source.set_frequency(12_345.0);
        assert!((0..10_000).all(|_| source.next_sample().is_finite()));
    }
}
