//! Reverb - Room Simulation via Delay Networks
//!
//! Classic Schroeder layout: parallel damped combs build the tail, series
//! allpasses diffuse it.
//!
//! ```text
//! Input ──┬──→ [Comb 1] ──┐
//!         ├──→ [Comb 2] ──┤
//!         ├──→ [Comb 3] ──┼──→ (+) ──→ [Allpass 1] ──→ [Allpass 2] ──→ Output
//!         └──→ [Comb 4] ──┘
//! ```
//!
//! Comb:    `y[n] = x[n] + feedback * lp(y[n - delay])`
//! Allpass: `y[n] = -g * x[n] + x[n - delay] + g * y[n - delay]`
//!
//! Comb lengths are mutually prime so their echoes do not pile up. A stereo
//! pair is built from two networks whose lengths differ by a small spread.

use std::f32::consts::TAU;

const COMB_DELAYS_MS: [f32; 4] = [29.7, 37.1, 41.1, 43.7];
const ALLPASS_DELAYS_MS: [f32; 2] = [5.0, 1.7];
const ALLPASS_FEEDBACK: f32 = 0.5;
const MAX_FEEDBACK: f32 = 0.98;

fn ms_to_samples(ms: f32, sample_rate: f32) -> usize {
    ((ms * sample_rate / 1000.0) as usize).max(1)
}

/// Damped feedback comb. The buffer is sized once at construction.
pub struct CombFilter {
    buffer: Vec<f32>,
    write_pos: usize,
    feedback: f32,
    damp: f32,
    filter_state: f32,
}

impl CombFilter {
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            write_pos: 0,
            feedback: 0.5,
            damp: 0.5,
            filter_state: 0.0,
        }
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, MAX_FEEDBACK);
    }

    pub fn set_damp(&mut self, damp: f32) {
        self.damp = damp.clamp(0.0, 1.0);
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.buffer[self.write_pos];

        // one-pole low-pass in the loop
        self.filter_state = output * (1.0 - self.damp) + self.filter_state * self.damp;
        self.buffer[self.write_pos] = input + self.filter_state * self.feedback;

        self.write_pos += 1;
        if self.write_pos == self.buffer.len() {
            self.write_pos = 0;
        }
        output
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.filter_state = 0.0;
        self.write_pos = 0;
    }
}

pub struct AllpassFilter {
    buffer: Vec<f32>,
    write_pos: usize,
    feedback: f32,
}

impl AllpassFilter {
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            write_pos: 0,
            feedback: ALLPASS_FEEDBACK,
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.write_pos];
        let output = -self.feedback * input + delayed;
        self.buffer[self.write_pos] = input + self.feedback * output;

        self.write_pos += 1;
        if self.write_pos == self.buffer.len() {
            self.write_pos = 0;
        }
        output
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

/// Schroeder reverb with 4 comb filters and 2 allpass filters.
pub struct SchroederReverb {
    combs: [CombFilter; 4],
    allpasses: [AllpassFilter; 2],
    sample_rate: f32,
}

impl SchroederReverb {
    /// `spread` adds that many samples to every delay, decorrelating a
    /// second channel from the first.
    pub fn new(sample_rate: f32, spread: usize) -> Self {
        let comb = |ms| CombFilter::new(ms_to_samples(ms, sample_rate) + spread);
        let allpass = |ms| AllpassFilter::new(ms_to_samples(ms, sample_rate) + spread);

        Self {
            combs: COMB_DELAYS_MS.map(comb),
            allpasses: ALLPASS_DELAYS_MS.map(allpass),
            sample_rate,
        }
    }

    /// Comb feedback, 0.0 (short) to 1.0 (long, clamped below self-oscillation).
    pub fn set_feedback(&mut self, feedback: f32) {
        if !feedback.is_finite() {
            return;
        }
        for comb in &mut self.combs {
            comb.set_feedback(feedback);
        }
    }

    /// Set the low-pass corner of the feedback loops in Hz.
    pub fn set_tone(&mut self, cutoff_hz: f32) {
        if !cutoff_hz.is_finite() {
            return;
        }
        let cutoff = cutoff_hz.clamp(20.0, self.sample_rate * 0.45);
        let damp = (-TAU * cutoff / self.sample_rate).exp();
        for comb in &mut self.combs {
            comb.set_damp(damp);
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let mut output = 0.0;
        for comb in &mut self.combs {
            output += comb.process(input);
        }
        output *= 0.25;

        for allpass in &mut self.allpasses {
            output = allpass.process(output);
        }
        output
    }

    pub fn reset(&mut self) {
        for comb in &mut self.combs {
            comb.reset();
        }
        for allpass in &mut self.allpasses {
            allpass.reset();
        }
    }
}
