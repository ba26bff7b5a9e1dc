use std::f32::consts::PI;

/*
Topology-preserving state-variable filter
=========================================

Two trapezoidal integrators in a loop. `g` is the prewarped integrator gain
and `k` the damping (k = 2 means no resonance, k -> 0 self-oscillates).

    g = tan(pi * cutoff / sample_rate)
    h = 1 / (1 + g * (g + k))

    v3 = x - ic2
    v1 = h * (ic1 + g * v3)          band-pass
    v2 = ic2 + g * v1                low-pass

Cutoff is clamped below Nyquist so `tan` stays finite; resonance stops
short of self-oscillation so the loop stays bounded.
*/

const MIN_CUTOFF_HZ: f32 = 20.0;
const MAX_RESONANCE: f32 = 0.98;

pub struct SVFilter {
    ic1eq: f32,
    ic2eq: f32,

    cutoff_hz: f32,
    resonance: f32,
    sample_rate: f32,

    g: f32,
    k: f32,
}

impl SVFilter {
    pub fn lowpass(sample_rate: f32, cutoff_hz: f32) -> Self {
        let mut filter = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            resonance: 0.0,
            sample_rate,
            g: 0.0,
            k: 2.0,
        };
        filter.set_cutoff(cutoff_hz);
        filter
    }

    /// Highest usable cutoff for this sample rate.
    pub fn max_cutoff(&self) -> f32 {
        self.sample_rate * 0.45
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        if !cutoff_hz.is_finite() {
            return;
        }
        self.cutoff_hz = cutoff_hz.clamp(MIN_CUTOFF_HZ, self.max_cutoff());
        self.g = (PI * self.cutoff_hz / self.sample_rate).tan();
    }

    pub fn set_resonance(&mut self, resonance: f32) {
        if !resonance.is_finite() {
            return;
        }
        self.resonance = resonance.clamp(0.0, MAX_RESONANCE);
        self.k = 2.0 - 2.0 * self.resonance;
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Filter one sample and return the low-pass output.
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let h = 1.0 / (1.0 + self.g * (self.g + self.k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + self.g * v3);
        let v2 = self.ic2eq + self.g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        v2
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}
