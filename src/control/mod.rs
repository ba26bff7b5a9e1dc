//! Control-context side of the event channel.

pub mod command;

pub use command::CommandDecoder;

use std::time::Instant;

use crate::event::{Event, EventProducer, Param, SourceId, SourceSelect};

/// Producer handle owned by one control surface.
///
/// Every event sent through a controller is stamped with the controller's
/// [`SourceId`] and the nanoseconds elapsed since the controller was created.
pub struct Controller {
    producer: EventProducer,
    source: SourceId,
    epoch: Instant,
    sent: u64,
    dropped: u64,
}

impl Controller {
    pub fn new(producer: EventProducer, source: SourceId) -> Self {
        tracing::debug!(?source, capacity = producer.capacity(), "controller attached");
        Self {
            producer,
            source,
            epoch: Instant::now(),
            sent: 0,
            dropped: 0,
        }
    }

    pub fn source(&self) -> SourceId {
        self.source
    }

    /// Events accepted by the channel.
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Events lost because the channel was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Stamp and push an event. Returns `false` if the channel was full and
    /// the event was dropped.
    pub fn send(&mut self, event: Event) -> bool {
        let elapsed = self.epoch.elapsed().as_nanos();
        let event = event
            .with_source(self.source)
            .with_timestamp(u64::try_from(elapsed).unwrap_or(u64::MAX));

        if self.producer.push(event) {
            self.sent += 1;
            true
        } else {
            self.dropped += 1;
            tracing::warn!(
                kind = ?event.kind,
                id = event.id,
                dropped = self.dropped,
                "event channel full, dropping event"
            );
            false
        }
    }

    pub fn note_on(&mut self, note: u8, velocity: u8) -> bool {
        self.send(Event::note_on(note, velocity))
    }

    pub fn note_off(&mut self, note: u8) -> bool {
        self.send(Event::note_off(note))
    }

    pub fn all_notes_off(&mut self) -> bool {
        self.send(Event::all_notes_off())
    }

    pub fn set_param(&mut self, param: Param, value: f32) -> bool {
        self.send(Event::param(param, value))
    }

    pub fn select_source(&mut self, source: SourceSelect) -> bool {
        self.set_param(Param::OscWave, source.to_wire())
    }

    /// Decode one textual command and send the resulting events. Returns
    /// `false` if any of them was dropped.
    pub fn command(&mut self, decoder: &mut CommandDecoder, line: &str) -> crate::Result<bool> {
        let mut accepted = true;
        for event in decoder.decode(line)? {
            accepted &= self.send(event);
        }
        Ok(accepted)
    }
}
