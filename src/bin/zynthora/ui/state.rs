//! UI-side state: the computer keyboard as a note source, and the input mode.

/// Computer keys laid out as one octave of a piano, starting at C.
const PIANO_KEYS: &str = "awsedftgyhujk";
const MIN_OCTAVE: i8 = 0;
const MAX_OCTAVE: i8 = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a `cmd:value` line after `:`.
    Command(String),
}

/// Terminals do not report key releases, so each piano key latches its note
/// until it is pressed again.
pub struct Keyboard {
    octave: i8,
    held: [bool; 128],
}

impl Default for Keyboard {
    fn default() -> Self {
        Self {
            octave: 4,
            held: [false; 128],
        }
    }
}

impl Keyboard {
    pub fn octave(&self) -> i8 {
        self.octave
    }

    pub fn shift_octave(&mut self, delta: i8) {
        self.octave = (self.octave + delta).clamp(MIN_OCTAVE, MAX_OCTAVE);
    }

    /// MIDI note for a piano key in the current octave.
    pub fn note_for(&self, key: char) -> Option<u8> {
        let offset = PIANO_KEYS.find(key)? as i32;
        let note = (self.octave as i32 + 1) * 12 + offset;
        u8::try_from(note).ok().filter(|n| *n <= 127)
    }

    /// Flip the latch for `note`. Returns `true` if the note is now held.
    pub fn toggle(&mut self, note: u8) -> bool {
        let slot = &mut self.held[note as usize & 0x7f];
        *slot = !*slot;
        *slot
    }

    pub fn release_all(&mut self) {
        self.held = [false; 128];
    }

    pub fn held(&self) -> impl Iterator<Item = u8> + '_ {
        self.held
            .iter()
            .enumerate()
            .filter(|(_, held)| **held)
            .map(|(note, _)| note as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piano_row_maps_to_semitones() {
        let keyboard = Keyboard::default();
        assert_eq!(keyboard.note_for('a'), Some(60));
        assert_eq!(keyboard.note_for('w'), Some(61));
        assert_eq!(keyboard.note_for('k'), Some(72));
        assert_eq!(keyboard.note_for('q'), None);
    }

    #[test]
    fn octave_is_clamped() {
        let mut keyboard = Keyboard::default();
        for _ in 0..20 {
            keyboard.shift_octave(1);
        }
        assert_eq!(keyboard.octave(), MAX_OCTAVE);
        assert_eq!(keyboard.note_for('a'), Some(120));
        assert_eq!(keyboard.note_for('k'), None);
    }

    #[test]
    fn toggle_latches() {
        let mut keyboard = Keyboard::default();
        assert!(keyboard.toggle(60));
        assert!(keyboard.toggle(64));
        assert_eq!(keyboard.held().collect::<Vec<_>>(), vec![60, 64]);
        assert!(!keyboard.toggle(60));
        keyboard.release_all();
        assert_eq!(keyboard.held().count(), 0);
    }
}
