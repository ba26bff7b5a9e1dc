use crate::effects::StereoFrame;

pub const MAX_AMP: f32 = 2.0;

/// Final output level.
pub struct MasterGain {
    amp: f32,
}

impl Default for MasterGain {
    fn default() -> Self {
        Self::new()
    }
}

impl MasterGain {
    pub fn new() -> Self {
        Self { amp: 0.5 }
    }

    pub fn set_amp(&mut self, amp: f32) {
        if amp.is_finite() {
            self.amp = amp.clamp(0.0, MAX_AMP);
        }
    }

    pub fn amp(&self) -> f32 {
        self.amp
    }

    #[inline]
    pub fn process(&mut self, frame: StereoFrame) -> StereoFrame {
        StereoFrame::new(frame.left * self.amp, frame.right * self.amp)
    }
}
