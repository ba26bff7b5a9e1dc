/// Static per-voice unison spread. Voice `i` uses `DETUNE_COEFFICIENTS[i % 4]`.
pub const DETUNE_COEFFICIENTS: [f32; 4] = [0.05, 0.35, 0.5, 0.45];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceState {
    #[default]
    Idle,
    Active,
}

/// One slot of the paraphonic pool. Voices carry pitch bookkeeping only;
/// the shared envelope and the sound source do the rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct Voice {
    note: Option<u8>,
    velocity: u8,
    state: VoiceState,
    stamp: u64,
}

impl Voice {
    pub(crate) fn start(&mut self, note: u8, velocity: u8, stamp: u64) {
        self.note = Some(note);
        self.velocity = velocity;
        self.state = VoiceState::Active;
        self.stamp = stamp;
    }

    pub(crate) fn free(&mut self) {
        self.note = None;
        self.state = VoiceState::Idle;
    }

    pub fn is_active(&self) -> bool {
        self.state == VoiceState::Active
    }

    pub fn holds(&self, note: u8) -> bool {
        self.is_active() && self.note == Some(note)
    }

    pub fn note(&self) -> Option<u8> {
        self.note
    }

    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    /// Insertion order; higher means triggered more recently.
    pub fn stamp(&self) -> u64 {
        self.stamp
    }
}

/// What a sound source sees of one voice during a block.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VoiceSnapshot {
    pub note: Option<u8>,
    pub velocity: u8,
    pub active: bool,
    /// Quantized pitch offset in semitones.
    pub detune: f32,
}

impl VoiceSnapshot {
    /// Fractional MIDI pitch including detune and an octave shift, or `None`
    /// for idle voices.
    pub fn pitch(&self, octave: i8) -> Option<f32> {
        if !self.active {
            return None;
        }
        self.note
            .map(|note| note as f32 + octave as f32 * 12.0 + self.detune)
    }
}

/// Quantize `detune * coefficient` to 1/255 semitone steps in 0..=127 units.
pub fn quantized_detune(detune: f32, index: usize) -> f32 {
    let coefficient = DETUNE_COEFFICIENTS[index % DETUNE_COEFFICIENTS.len()];
    let detune = if detune.is_finite() {
        detune.clamp(0.0, 1.0)
    } else {
        0.0
    };
    (detune * coefficient * 127.0).floor() / 255.0
}
