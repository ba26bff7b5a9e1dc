use crate::synth::voice::{quantized_detune, Voice, VoiceSnapshot};
use crate::VOICE_COUNT;

/// Where a NoteOn landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allocation {
    /// An idle voice took the note.
    Assigned(usize),
    /// The oldest active voice was reassigned.
    Stolen { index: usize, replaced: u8 },
    /// The note was already held; nothing changed.
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteOnOutcome {
    pub allocation: Allocation,
    /// The pool went from zero active voices to one.
    pub phrase_start: bool,
}

/// Fixed pool of paraphonic voices with oldest-first stealing.
///
/// Every assignment (including a steal) takes a fresh stamp from a
/// monotonically increasing counter, so "oldest" always means "least
/// recently assigned". The active count is derived from voice states and can
/// never drift from them.
pub struct VoiceAllocator<const N: usize = VOICE_COUNT> {
    voices: [Voice; N],
    next_stamp: u64,
}

impl<const N: usize> Default for VoiceAllocator<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> VoiceAllocator<N> {
    pub fn new() -> Self {
        Self {
            voices: [Voice::default(); N],
            next_stamp: 0,
        }
    }

    pub fn note_on(&mut self, note: u8, velocity: u8) -> NoteOnOutcome {
        let phrase_start = self.active_count() == 0;

        if self.voices.iter().any(|voice| voice.holds(note)) {
            return NoteOnOutcome {
                allocation: Allocation::Duplicate,
                phrase_start: false,
            };
        }

        let stamp = self.next_stamp;
        self.next_stamp += 1;

        let allocation = match self.voices.iter().position(|voice| !voice.is_active()) {
            Some(index) => {
                self.voices[index].start(note, velocity, stamp);
                Allocation::Assigned(index)
            }
            None => {
                // min_by_key keeps the first minimum, so ties go to the lowest index
                let Some((index, _)) = self
                    .voices
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, voice)| voice.stamp())
                else {
                    // zero-sized pool
                    return NoteOnOutcome {
                        allocation: Allocation::Duplicate,
                        phrase_start: false,
                    };
                };

                let replaced = self.voices[index].note().unwrap_or_default();
                self.voices[index].start(note, velocity, stamp);
                Allocation::Stolen { index, replaced }
            }
        };

        NoteOnOutcome {
            allocation,
            phrase_start,
        }
    }

    /// Release the voice holding `note`. Returns whether one was found.
    pub fn note_off(&mut self, note: u8) -> bool {
        match self.voices.iter_mut().find(|voice| voice.holds(note)) {
            Some(voice) => {
                voice.free();
                true
            }
            None => false,
        }
    }

    pub fn all_notes_off(&mut self) {
        for voice in &mut self.voices {
            voice.free();
        }
    }

    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|voice| voice.is_active()).count()
    }

    /// Gate for the shared envelope.
    pub fn any_active(&self) -> bool {
        self.voices.iter().any(Voice::is_active)
    }

    /// Most recently assigned active note.
    pub fn latest_note(&self) -> Option<u8> {
        self.voices
            .iter()
            .filter(|voice| voice.is_active())
            .max_by_key(|voice| voice.stamp())
            .and_then(Voice::note)
    }

    pub fn voices(&self) -> &[Voice; N] {
        &self.voices
    }

    /// Per-voice view with the detune amount applied.
    pub fn snapshot(&self, detune: f32) -> [VoiceSnapshot; N] {
        std::array::from_fn(|index| {
            let voice = &self.voices[index];
            VoiceSnapshot {
                note: voice.note(),
                velocity: voice.velocity(),
                active: voice.is_active(),
                detune: quantized_detune(detune, index),
            }
        })
    }
}
