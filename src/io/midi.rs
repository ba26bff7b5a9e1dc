/// Channel voice messages from a hardware or virtual MIDI port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

/// Controller number of the "All Sound Off" channel mode message.
pub const CC_ALL_SOUND_OFF: u8 = 120;
/// Controller number of the "All Notes Off" channel mode message.
pub const CC_ALL_NOTES_OFF: u8 = 123;

impl MidiEvent {
    /// Parse one complete channel message (status byte first). Running
    /// status, system messages and truncated input yield `None`.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        if status & 0x80 == 0 {
            return None;
        }
        let channel = status & 0x0f;
        let byte = |i: usize| data.get(i).copied().filter(|b| b & 0x80 == 0);

        Some(match status & 0xf0 {
            0x80 => MidiEvent::NoteOff {
                channel,
                key: byte(0)?,
                velocity: byte(1)?,
            },
            0x90 => MidiEvent::NoteOn {
                channel,
                key: byte(0)?,
                velocity: byte(1)?,
            },
            0xb0 => MidiEvent::ControlChange {
                channel,
                controller: byte(0)?,
                value: byte(1)?,
            },
            0xc0 => MidiEvent::ProgramChange {
                channel,
                program: byte(0)?,
            },
            0xe0 => {
                let raw = (byte(1)? as i16) << 7 | byte(0)? as i16;
                MidiEvent::PitchBend {
                    channel,
                    value: raw - 8192,
                }
            }
            _ => return None,
        })
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::ControlChange { channel, .. }
            | MidiEvent::PitchBend { channel, .. }
            | MidiEvent::ProgramChange { channel, .. } => channel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_channel_messages() {
        assert_eq!(
            MidiEvent::parse(&[0x93, 60, 100]),
            Some(MidiEvent::NoteOn {
                channel: 3,
                key: 60,
                velocity: 100
            })
        );
        assert_eq!(
            MidiEvent::parse(&[0xb0, CC_ALL_NOTES_OFF, 0]),
            Some(MidiEvent::ControlChange {
                channel: 0,
                controller: 123,
                value: 0
            })
        );
        assert_eq!(
            MidiEvent::parse(&[0xe0, 0x00, 0x40]),
            Some(MidiEvent::PitchBend {
                channel: 0,
                value: 0
            })
        );
    }

    #[test]
    fn rejects_truncated_and_system_messages() {
        assert_eq!(MidiEvent::parse(&[]), None);
        assert_eq!(MidiEvent::parse(&[0x90, 60]), None);
        assert_eq!(MidiEvent::parse(&[60, 100]), None);
        assert_eq!(MidiEvent::parse(&[0xf8]), None);
        assert_eq!(MidiEvent::parse(&[0x90, 0xff, 1]), None);
    }
}
