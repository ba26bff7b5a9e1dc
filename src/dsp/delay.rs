/// Circular buffer of past samples.
///
/// The buffer length is fixed at construction; reads further back than the
/// buffer holds are clamped to the oldest stored sample.
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    pub fn new(max_delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; max_delay_samples.max(2)],
            write_pos: 0,
        }
    }

    /// Number of samples the line can hold.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Push one sample into the line.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos += 1;
        if self.write_pos == self.buffer.len() {
            self.write_pos = 0;
        }
    }

    /// Read the sample written `delay_samples` writes ago (1 = most recent).
    #[inline]
    pub fn read(&self, delay_samples: usize) -> f32 {
        let len = self.buffer.len();
        let delay = delay_samples.clamp(1, len);
        let index = (self.write_pos + len - delay) % len;
        self.buffer[index]
    }

    /// Linearly interpolated read at a fractional delay.
    #[inline]
    pub fn read_interpolated(&self, delay_samples: f32) -> f32 {
        let max = (self.buffer.len() - 1) as f32;
        let delay = if delay_samples.is_finite() {
            delay_samples.clamp(1.0, max)
        } else {
            1.0
        };

        let whole = delay.floor();
        let frac = delay - whole;
        let a = self.read(whole as usize);
        let b = self.read(whole as usize + 1);
        a + (b - a) * frac
    }

    /// Delay the buffer in place by a fixed number of samples.
    pub fn render(&mut self, buffer: &mut [f32], delay_samples: usize) {
        for sample in buffer.iter_mut() {
            self.write(*sample);
            *sample = self.read(delay_samples + 1);
        }
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}
