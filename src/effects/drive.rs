use crate::dsp::distortion::{drive_gain, soft_clip};

/// Soft-clip waveshaper. Makeup gain maps a full-scale input back to 1.0.
pub struct Drive {
    amount: f32,
    gain: f32,
    makeup: f32,
}

impl Default for Drive {
    fn default() -> Self {
        Self::new()
    }
}

impl Drive {
    pub fn new() -> Self {
        let mut drive = Self {
            amount: 0.0,
            gain: 1.0,
            makeup: 1.0,
        };
        drive.set_amount(0.0);
        drive
    }

    /// Drive amount 0.0 - 1.0.
    pub fn set_amount(&mut self, amount: f32) {
        if !amount.is_finite() {
            return;
        }
        self.amount = amount.clamp(0.0, 1.0);
        self.gain = drive_gain(self.amount);
        self.makeup = 1.0 / soft_clip(1.0, self.gain);
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        soft_clip(sample, self.gain) * self.makeup
    }
}
