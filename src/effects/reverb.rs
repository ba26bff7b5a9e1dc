use crate::dsp::reverb::SchroederReverb;
use crate::effects::StereoFrame;

/// Samples added to every right-channel delay for decorrelation.
const STEREO_SPREAD: usize = 23;
const WET: f32 = 0.35;

/// Two Schroeder networks, one per channel, mixed with the dry signal.
pub struct StereoReverb {
    left: SchroederReverb,
    right: SchroederReverb,
    time: f32,
    tone: f32,
}

impl StereoReverb {
    pub fn new(sample_rate: f32) -> Self {
        let mut reverb = Self {
            left: SchroederReverb::new(sample_rate, 0),
            right: SchroederReverb::new(sample_rate, STEREO_SPREAD),
            time: 0.85,
            tone: 10_000.0,
        };
        reverb.set_time(0.85);
        reverb.set_tone(10_000.0);
        reverb
    }

    /// Decay amount 0.0 - 1.0 (comb feedback).
    pub fn set_time(&mut self, time: f32) {
        if !time.is_finite() {
            return;
        }
        self.time = time.clamp(0.0, 1.0);
        self.left.set_feedback(self.time);
        self.right.set_feedback(self.time);
    }

    /// Low-pass corner of the tail in Hz.
    pub fn set_tone(&mut self, cutoff_hz: f32) {
        if !cutoff_hz.is_finite() {
            return;
        }
        self.tone = cutoff_hz;
        self.left.set_tone(cutoff_hz);
        self.right.set_tone(cutoff_hz);
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    pub fn process(&mut self, frame: StereoFrame) -> StereoFrame {
        let wet_left = self.left.process(frame.left);
        let wet_right = self.right.process(frame.right);
        StereoFrame::new(
            frame.left * (1.0 - WET) + wet_left * WET,
            frame.right * (1.0 - WET) + wet_right * WET,
        )
    }

    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_is_stereo() {
        let mut reverb = StereoReverb::new(48_000.0);
        reverb.process(StereoFrame::mono(1.0));
        let mut decorrelated = false;
        for _ in 0..48_000 {
            let frame = reverb.process(StereoFrame::mono(0.0));
            if (frame.left - frame.right).abs() > 1e-4 {
                decorrelated = true;
            }
        }
        assert!(decorrelated);
    }

    #[test]
    fn longer_time_rings_longer() {
        let energy = |time: f32| {
            let mut reverb = StereoReverb::new(48_000.0);
            reverb.set_time(time);
            reverb.process(StereoFrame::mono(1.0));
            (0..96_000)
                .map(|_| reverb.process(StereoFrame::mono(0.0)).left.powi(2))
                .skip(48_000)
                .sum::<f32>()
        };
        assert!(energy(0.95) > energy(0.3));
    }
}
