//! Per-block event dispatch.
//!
//! The router runs once at the top of every render block. It pops at most
//! one channel-capacity worth of events, so a control thread that floods the
//! channel cannot starve the render loop; anything left over is handled on
//! the next block. It never blocks, allocates or logs.

use crate::dsp::oscillator::midi_to_freq;
use crate::engine::Instrument;
use crate::event::{Event, EventKind, EventSource, Param, TRANSPORT_STOP};
use crate::synth::Allocation;

/// Counters kept by the router.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouterStats {
    /// Events that changed (or were accepted by) render state.
    pub applied: u64,
    /// Unknown ids, invalid values, and kinds with no render-side effect.
    pub ignored: u64,
    /// NoteOns that found every voice busy.
    pub steals: u64,
}

#[derive(Debug, Default)]
pub struct ParameterRouter {
    stats: RouterStats,
}

impl ParameterRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> RouterStats {
        self.stats
    }

    /// Pop and dispatch pending events. Returns how many were popped.
    pub(crate) fn drain<S: EventSource + ?Sized>(
        &mut self,
        events: &mut S,
        instrument: &mut Instrument,
    ) -> usize {
        let limit = events.capacity();
        let mut drained = 0;
        while drained < limit {
            let Some(event) = events.pop() else {
                break;
            };
            drained += 1;

            if self.dispatch(event, instrument) {
                self.stats.applied += 1;
            } else {
                self.stats.ignored += 1;
            }
        }
        drained
    }

    fn dispatch(&mut self, event: Event, instrument: &mut Instrument) -> bool {
        match event.kind {
            EventKind::NoteOn => match event.note() {
                Some(note) => {
                    self.note_on(note, event.velocity(), instrument);
                    true
                }
                None => false,
            },
            EventKind::NoteOff => match event.note() {
                Some(note) => {
                    Self::note_off(note, instrument);
                    true
                }
                None => false,
            },
            EventKind::AllNotesOff => {
                instrument.allocator.all_notes_off();
                true
            }
            EventKind::Transport if event.id == TRANSPORT_STOP => {
                instrument.stop();
                true
            }
            EventKind::ParamChange => match Param::from_id(event.id) {
                Some(param) => Self::apply_param(param, event.value, instrument),
                None => false,
            },
            EventKind::Transport | EventKind::PageSwitch | EventKind::LockParam => false,
        }
    }

    fn note_on(&mut self, note: u8, velocity: u8, instrument: &mut Instrument) {
        let outcome = instrument.allocator.note_on(note, velocity);
        if outcome.allocation == Allocation::Duplicate {
            return;
        }
        if matches!(outcome.allocation, Allocation::Stolen { .. }) {
            self.stats.steals += 1;
        }
        if outcome.phrase_start && instrument.declick {
            instrument.mux.declick();
        }

        // monophonic sources follow the most recent note
        let frequency = midi_to_freq(note as f32);
        instrument.params.frequency = frequency;
        instrument.mux.set_frequency(frequency);
        instrument.mux.trigger();
    }

    fn note_off(note: u8, instrument: &mut Instrument) {
        if !instrument.allocator.note_off(note) {
            return;
        }
        if let Some(latest) = instrument.allocator.latest_note() {
            let frequency = midi_to_freq(latest as f32);
            instrument.params.frequency = frequency;
            instrument.mux.set_frequency(frequency);
        }
    }

    fn apply_param(param: Param, value: f32, instrument: &mut Instrument) -> bool {
        if !value.is_finite() || !instrument.params.store(param, value) {
            return false;
        }

        match param {
            Param::OscWave => instrument.mux.select(instrument.params.source),
            Param::OscFreq => instrument.mux.set_frequency(value),
            Param::AmpAttack => instrument.envelope.set_attack(value),
            Param::AmpDecay => instrument.envelope.set_decay(value),
            Param::AmpSustain => instrument.envelope.set_sustain(value),
            Param::AmpRelease => instrument.envelope.set_release(value),
            _ => {
                if !instrument.chain.set_param(param, value) {
                    instrument.mux.set_param(param, value);
                }
            }
        }
        true
    }
}
