use crate::dsp::delay::DelayLine;
use crate::dsp::lfo::Lfo;
use crate::effects::StereoFrame;

/*
Stereo chorus
=============

Each channel writes into its own short delay line and reads back at a
swept, fractionally interpolated offset:

    left  delay = base + lfo * swing
    right delay = base - lfo * swing      (inverted LFO -> stereo width)

    base  = 20 ms
    swing = 10 ms * depth                 (10 - 30 ms at full depth)

Dry and wet are summed at equal level and scaled by 1/sqrt(2).
*/

const BASE_DELAY_S: f32 = 0.020;
const SWING_S: f32 = 0.010;
const BUFFER_S: f32 = 0.100;
const MIX: f32 = std::f32::consts::FRAC_1_SQRT_2;

pub struct Chorus {
    left: DelayLine,
    right: DelayLine,
    lfo: Lfo,
    depth: f32,
    base_delay: f32,
    swing: f32,
}

impl Chorus {
    pub fn new(sample_rate: f32) -> Self {
        let mut chorus = Self {
            left: DelayLine::new((BUFFER_S * sample_rate) as usize),
            right: DelayLine::new((BUFFER_S * sample_rate) as usize),
            lfo: Lfo::new(sample_rate, 0.5),
            depth: 0.8,
            base_delay: BASE_DELAY_S * sample_rate,
            swing: SWING_S * sample_rate,
        };
        chorus.set_depth(0.8);
        chorus
    }

    /// LFO rate in Hz.
    pub fn set_rate(&mut self, rate_hz: f32) {
        self.lfo.set_rate(rate_hz);
    }

    /// Sweep depth 0.0 - 1.0.
    pub fn set_depth(&mut self, depth: f32) {
        if depth.is_finite() {
            self.depth = depth.clamp(0.0, 1.0);
        }
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    #[inline]
    pub fn process(&mut self, frame: StereoFrame) -> StereoFrame {
        self.left.write(frame.left);
        self.right.write(frame.right);

        let sweep = self.lfo.next_sample() * self.swing * self.depth;
        let wet_left = self.left.read_interpolated(self.base_delay + sweep);
        let wet_right = self.right.read_interpolated(self.base_delay - sweep);

        StereoFrame::new(
            (frame.left + wet_left) * MIX,
            (frame.right + wet_right) * MIX,
        )
    }

    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        self.lfo.reset();
    }
}
