//! Zynthora: a remotely controllable paraphonic synthesizer core.
//!
//! A control context (network, UI, MIDI) pushes fixed-size [`Event`] records
//! into a lock-free SPSC [`event::channel`]. The render context owns an
//! [`Engine`] that drains the channel once per block, routes each event to
//! the voice pool, parameter cache, sound source selector and effect chain,
//! then renders the block sample by sample without locking or allocating.
//!
//! ```
//! use zynthora::{control::Controller, event, Engine, EngineConfig};
//!
//! let config = EngineConfig::default();
//! let (producer, consumer) = event::channel(config.event_capacity).unwrap();
//! let mut engine = Engine::new(config, consumer).unwrap();
//! let mut controller = Controller::new(producer, event::SourceId::GuiMain);
//!
//! controller.note_on(60, 100);
//! let mut out = vec![0.0f32; 256 * 2];
//! engine.render(&mut out, 2);
//! ```

pub mod config;
pub mod control;
pub mod dsp;
pub mod effects;
pub mod engine;
pub mod error;
pub mod event;
pub mod io;
pub mod source;
pub mod synth; // Voice management and paraphony

pub use config::EngineConfig;
pub use engine::{Engine, EngineStatus};
pub use error::{Error, Result};
pub use event::{Event, EventKind, SourceId};

/// Size of the paraphonic voice pool.
pub const VOICE_COUNT: usize = 4;
pub const MAX_BLOCK_SIZE: usize = 2048;
pub const DEFAULT_SAMPLE_RATE: f32 = 48_000.0;
pub const DEFAULT_EVENT_CAPACITY: usize = 512;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
