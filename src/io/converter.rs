use crate::event::Event;
use crate::io::midi::{MidiEvent, CC_ALL_NOTES_OFF, CC_ALL_SOUND_OFF};

/// Convert a MIDI message into an engine event.
///
/// `channel_filter` of `None` accepts every channel (omni). A NoteOn with
/// velocity 0 is a NoteOff, and the channel mode messages "All Notes Off"
/// and "All Sound Off" release every voice. Everything else has no event
/// mapping.
pub fn midi_to_event(midi: MidiEvent, channel_filter: Option<u8>) -> Option<Event> {
    if channel_filter.is_some_and(|channel| channel != midi.channel()) {
        return None;
    }

    match midi {
        MidiEvent::NoteOn { key, velocity: 0, .. } => Some(Event::note_off(key)),
        MidiEvent::NoteOn { key, velocity, .. } => Some(Event::note_on(key, velocity)),
        MidiEvent::NoteOff { key, .. } => Some(Event::note_off(key)),
        MidiEvent::ControlChange {
            controller: CC_ALL_NOTES_OFF | CC_ALL_SOUND_OFF,
            ..
        } => Some(Event::all_notes_off()),
        _ => None,
    }
}
