use crate::dsp::filter::SVFilter;

/// Envelope sweep range in octaves at full depth.
const ENV_OCTAVES: f32 = 6.0;

/// Resonant low-pass whose cutoff can follow the shared envelope.
pub struct EnvelopeFilter {
    svf: SVFilter,
    cutoff: f32,
    env_depth: f32,
}

impl EnvelopeFilter {
    pub fn new(sample_rate: f32) -> Self {
        let svf = SVFilter::lowpass(sample_rate, 20_000.0);
        Self {
            cutoff: svf.cutoff(),
            svf,
            env_depth: 0.0,
        }
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.svf.set_cutoff(cutoff_hz);
        self.cutoff = self.svf.cutoff();
    }

    pub fn set_resonance(&mut self, resonance: f32) {
        self.svf.set_resonance(resonance);
    }

    /// 0.0 (static cutoff) to 1.0 (envelope opens the filter six octaves).
    pub fn set_env_depth(&mut self, depth: f32) {
        if depth.is_finite() {
            self.env_depth = depth.clamp(0.0, 1.0);
            if self.env_depth == 0.0 {
                self.svf.set_cutoff(self.cutoff);
            }
        }
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    #[inline]
    pub fn process(&mut self, sample: f32, envelope: f32) -> f32 {
        if self.env_depth > 0.0 {
            let octaves = envelope * self.env_depth * ENV_OCTAVES;
            self.svf.set_cutoff(self.cutoff * octaves.exp2());
        }
        self.svf.process(sample)
    }

    pub fn reset(&mut self) {
        self.svf.reset();
    }
}
