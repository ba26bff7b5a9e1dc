//! The event protocol shared by every control surface and the render thread.
//!
//! An [`Event`] is a 16-byte value record. It is created once by the control
//! context, pushed once into the [`channel`], consumed at most once by the
//! render context, and then its slot is simply overwritten.
//!
//! Wire layout (little-endian):
//!
//! ```text
//! 0        8      9      10       12       16
//! ├────────┼──────┼──────┼────────┼────────┤
//! │ ts ns  │ src  │ type │   id   │ value  │
//! └────────┴──────┴──────┴────────┴────────┘
//! ```

pub mod channel;
pub mod params;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub use channel::{channel, EventConsumer, EventProducer, EventSource};
pub use params::{as_toggle, Param, SourceSelect};

/// Encoded size of an [`Event`].
pub const EVENT_WIRE_SIZE: usize = 16;

/// Who sent an event.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum SourceId {
    /// Internal: clock, init
    #[default]
    System = 0x00,
    /// Main phone/tablet interface
    GuiMain = 0x10,
    /// Second client (multi-user)
    GuiClientB = 0x11,
    ModSeq = 0x20,
    ModBass = 0x30,
    ModPads = 0x40,
    ModConductor = 0x50,
}

impl TryFrom<u8> for SourceId {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self> {
        Ok(match byte {
            0x00 => SourceId::System,
            0x10 => SourceId::GuiMain,
            0x11 => SourceId::GuiClientB,
            0x20 => SourceId::ModSeq,
            0x30 => SourceId::ModBass,
            0x40 => SourceId::ModPads,
            0x50 => SourceId::ModConductor,
            other => return Err(Error::UnknownSource(other)),
        })
    }
}

/// What an event means.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum EventKind {
    #[default]
    NoteOn = 0x01,
    NoteOff = 0x02,
    ParamChange = 0x03,
    /// Focus a module on the GUI; no render-side effect.
    PageSwitch = 0x04,
    /// Play/stop/rewind. Stop (id 0) releases every voice.
    Transport = 0x05,
    /// Multi-user parameter lock; no render-side effect.
    LockParam = 0x06,
    AllNotesOff = 0x07,
}

impl TryFrom<u8> for EventKind {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self> {
        Ok(match byte {
            0x01 => EventKind::NoteOn,
            0x02 => EventKind::NoteOff,
            0x03 => EventKind::ParamChange,
            0x04 => EventKind::PageSwitch,
            0x05 => EventKind::Transport,
            0x06 => EventKind::LockParam,
            0x07 => EventKind::AllNotesOff,
            other => return Err(Error::UnknownEventKind(other)),
        })
    }
}

/// Transport id that stops playback and releases all voices.
pub const TRANSPORT_STOP: u16 = 0;

/// One control message. `id` is a note number for note events and a
/// [`Param`] id for parameter changes; the two namespaces never overlap
/// because the event kind disambiguates them.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct Event {
    pub timestamp_ns: u64,
    pub source: SourceId,
    pub kind: EventKind,
    pub id: u16,
    pub value: f32,
}

const _: () = assert!(std::mem::size_of::<Event>() == EVENT_WIRE_SIZE);

impl Event {
    pub fn new(kind: EventKind, id: u16, value: f32) -> Self {
        Self {
            timestamp_ns: 0,
            source: SourceId::System,
            kind,
            id,
            value,
        }
    }

    pub fn note_on(note: u8, velocity: u8) -> Self {
        Self::new(EventKind::NoteOn, note as u16, velocity as f32)
    }

    pub fn note_off(note: u8) -> Self {
        Self::new(EventKind::NoteOff, note as u16, 0.0)
    }

    pub fn all_notes_off() -> Self {
        Self::new(EventKind::AllNotesOff, 0, 0.0)
    }

    pub fn param(param: Param, value: f32) -> Self {
        Self::new(EventKind::ParamChange, param.id(), value)
    }

    /// Parameter change with a raw id, including ids this build does not know.
    pub fn param_raw(id: u16, value: f32) -> Self {
        Self::new(EventKind::ParamChange, id, value)
    }

    pub fn with_source(mut self, source: SourceId) -> Self {
        self.source = source;
        self
    }

    pub fn with_timestamp(mut self, timestamp_ns: u64) -> Self {
        self.timestamp_ns = timestamp_ns;
        self
    }

    /// Note number carried by a note event, if it is a valid MIDI note.
    pub fn note(&self) -> Option<u8> {
        u8::try_from(self.id).ok().filter(|n| *n <= 127)
    }

    /// Velocity carried by a NoteOn, clamped to the MIDI range.
    pub fn velocity(&self) -> u8 {
        if self.value.is_finite() {
            self.value.round().clamp(0.0, 127.0) as u8
        } else {
            0
        }
    }

    pub fn to_bytes(&self) -> [u8; EVENT_WIRE_SIZE] {
        let mut bytes = [0u8; EVENT_WIRE_SIZE];
        bytes[0..8].copy_from_slice(&self.timestamp_ns.to_le_bytes());
        bytes[8] = self.source as u8;
        bytes[9] = self.kind as u8;
        bytes[10..12].copy_from_slice(&self.id.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.value.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: &[u8; EVENT_WIRE_SIZE] = bytes.try_into().map_err(|_| Error::WireLength {
            expected: EVENT_WIRE_SIZE,
            actual: bytes.len(),
        })?;

        let mut ts = [0u8; 8];
        ts.copy_from_slice(&bytes[0..8]);

        Ok(Self {
            timestamp_ns: u64::from_le_bytes(ts),
            source: SourceId::try_from(bytes[8])?,
            kind: EventKind::try_from(bytes[9])?,
            id: u16::from_le_bytes([bytes[10], bytes[11]]),
            value: f32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
        })
    }
}
