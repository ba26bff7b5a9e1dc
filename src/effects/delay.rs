use crate::dsp::delay::DelayLine;
use crate::effects::StereoFrame;

pub const MAX_DELAY_SECONDS: f32 = 2.0;
const MAX_FEEDBACK: f32 = 0.95;

/// Stereo feedback delay.
///
/// Per channel and per sample the tap is read before the new sample is
/// written, so the feedback path is always one full delay old:
///
/// ```text
/// tap   = line.read(time)
/// line.write(dry + tap * feedback)
/// out   = dry + tap
/// ```
pub struct StereoDelay {
    left: DelayLine,
    right: DelayLine,
    delay_samples: usize,
    feedback: f32,
    sample_rate: f32,
}

impl StereoDelay {
    pub fn new(sample_rate: f32) -> Self {
        let capacity = (MAX_DELAY_SECONDS * sample_rate) as usize;
        let mut delay = Self {
            left: DelayLine::new(capacity),
            right: DelayLine::new(capacity),
            delay_samples: 1,
            feedback: 0.4,
            sample_rate,
        };
        delay.set_time(0.35);
        delay
    }

    /// Delay time in seconds.
    pub fn set_time(&mut self, seconds: f32) {
        if !seconds.is_finite() {
            return;
        }
        let max = self.left.len();
        self.delay_samples = ((seconds * self.sample_rate).round().max(1.0) as usize).min(max);
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        if feedback.is_finite() {
            self.feedback = feedback.clamp(0.0, MAX_FEEDBACK);
        }
    }

    pub fn delay_samples(&self) -> usize {
        self.delay_samples
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    #[inline]
    pub fn process(&mut self, frame: StereoFrame) -> StereoFrame {
        let tap_left = self.left.read(self.delay_samples);
        let tap_right = self.right.read(self.delay_samples);

        self.left.write(frame.left + tap_left * self.feedback);
        self.right.write(frame.right + tap_right * self.feedback);

        StereoFrame::new(frame.left + tap_left, frame.right + tap_right)
    }

    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }
}
