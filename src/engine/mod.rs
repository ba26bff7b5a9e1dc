//! The render-side engine.
//!
//! [`Engine`] owns everything the audio callback touches: the event
//! consumer, the router, the voice pool, the parameter cache, the sound
//! source mux, the shared envelope and the effect chain. It is built in the
//! control context (where allocation is fine) and then moved into the audio
//! callback; after that nothing else can reach its state.

pub mod params;
pub mod router;

pub use params::EngineParams;
pub use router::{ParameterRouter, RouterStats};

use crate::config::EngineConfig;
use crate::dsp::envelope::Envelope;
use crate::dsp::sanitize;
use crate::effects::{EffectChain, StageFlags};
use crate::event::{EventConsumer, EventSource, Param, SourceSelect};
use crate::source::{RenderCtx, SoundSource, SoundSourceMux};
use crate::synth::{VoiceAllocator, VoiceSnapshot};
use crate::{Result, VOICE_COUNT};

/// Render state mutated by the router.
pub(crate) struct Instrument {
    pub allocator: VoiceAllocator,
    pub params: EngineParams,
    pub mux: SoundSourceMux,
    pub envelope: Envelope,
    pub chain: EffectChain,
    pub declick: bool,
}

impl Instrument {
    fn new(config: &EngineConfig) -> Self {
        let params = EngineParams::from_config(config);
        let mut chain = EffectChain::new(config.sample_rate);
        chain.set_param(Param::MasterAmp, params.master_amp);

        Self {
            allocator: VoiceAllocator::new(),
            mux: SoundSourceMux::new(config.sample_rate),
            envelope: Envelope::adsr(
                config.sample_rate,
                config.attack,
                config.decay,
                config.sustain,
                config.release,
            ),
            chain,
            params,
            declick: config.declick,
        }
    }

    /// Transport stop: release every voice and cut the envelope and effect
    /// tails, so the next block is silent.
    pub fn stop(&mut self) {
        self.allocator.all_notes_off();
        self.envelope.reset();
        self.chain.reset();
    }
}

/// Point-in-time view of the engine for displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineStatus {
    pub source: SourceSelect,
    pub gate: bool,
    pub envelope: f32,
    pub voices: [VoiceSnapshot; VOICE_COUNT],
    pub active_voices: usize,
    pub frequency: f32,
    pub master_amp: f32,
    pub stages: StageFlags,
    pub router: RouterStats,
    pub frames_rendered: u64,
}

pub struct Engine<S: EventSource = EventConsumer> {
    events: S,
    router: ParameterRouter,
    instrument: Instrument,
    sample_rate: f32,
    frames_rendered: u64,
}

impl<S: EventSource> Engine<S> {
    pub fn new(config: EngineConfig, events: S) -> Result<Self> {
        config.validate()?;

        tracing::info!(
            sample_rate = config.sample_rate,
            event_capacity = events.capacity(),
            voices = VOICE_COUNT,
            "engine created"
        );

        Ok(Self {
            events,
            router: ParameterRouter::new(),
            instrument: Instrument::new(&config),
            sample_rate: config.sample_rate,
            frames_rendered: 0,
        })
    }

    /// Install an external macro-oscillator engine in slot 0 or 1.
    pub fn with_macro(mut self, slot: usize, engine: Box<dyn SoundSource>) -> Self {
        self.install_macro(slot, engine);
        self
    }

    /// Install an external engine, returning the slot's previous occupant
    /// (or `engine` itself when `slot` is out of range).
    pub fn install_macro(
        &mut self,
        slot: usize,
        engine: Box<dyn SoundSource>,
    ) -> Option<Box<dyn SoundSource>> {
        tracing::debug!(slot, "installing macro engine");
        self.instrument.mux.install_macro(slot, engine)
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn params(&self) -> &EngineParams {
        &self.instrument.params
    }

    /// Render one block of interleaved frames.
    ///
    /// Pending events are applied first, so every sample of the block sees
    /// the same parameters. One channel receives the left signal, two
    /// channels receive left/right, any further channels are zeroed. A
    /// trailing partial frame is zeroed.
    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        self.router.drain(&mut self.events, &mut self.instrument);

        if channels == 0 {
            out.fill(0.0);
            return;
        }

        let instrument = &mut self.instrument;
        let gate = instrument.allocator.any_active();
        let voices = instrument.allocator.snapshot(instrument.params.detune);
        instrument
            .mux
            .prepare(&RenderCtx::new(self.sample_rate, &voices));

        let mut chunks = out.chunks_exact_mut(channels);
        for frame in &mut chunks {
            let level = instrument.envelope.process(gate);
            let sample = instrument.mux.next_sample() * level;
            let output = instrument
                .chain
                .process(sample, level, &instrument.params.stages);

            let left = sanitize(output.left);
            let right = sanitize(output.right);
            match frame {
                [mono] => *mono = left,
                [l, r, rest @ ..] => {
                    *l = left;
                    *r = right;
                    rest.fill(0.0);
                }
                [] => {}
            }
            self.frames_rendered += 1;
        }
        chunks.into_remainder().fill(0.0);
    }

    pub fn status(&self) -> EngineStatus {
        let instrument = &self.instrument;
        EngineStatus {
            source: instrument.mux.active(),
            gate: instrument.allocator.any_active(),
            envelope: instrument.envelope.level(),
            voices: instrument.allocator.snapshot(instrument.params.detune),
            active_voices: instrument.allocator.active_count(),
            frequency: instrument.params.frequency,
            master_amp: instrument.chain.master.amp(),
            stages: instrument.params.stages,
            router: self.router.stats(),
            frames_rendered: self.frames_rendered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::Waveform;
    use crate::event::{self, Event, EventKind, EventProducer};

    fn engine() -> (EventProducer, Engine) {
        let config = EngineConfig::default();
        let (tx, rx) = event::channel(16).unwrap();
        (tx, Engine::new(config, rx).unwrap())
    }

    fn block(engine: &mut Engine, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames * 2];
        engine.render(&mut out, 2);
        out
    }

    #[test]
    fn silent_until_a_note_arrives() {
        let (mut tx, mut engine) = engine();
        assert!(block(&mut engine, 256).iter().all(|s| *s == 0.0));

        tx.push(Event::note_on(69, 100));
        let out = block(&mut engine, 256);
        assert!(out.iter().any(|s| s.abs() > 1e-3));
        assert!(engine.status().gate);
        assert_eq!(engine.status().frequency, 440.0);
    }

    #[test]
    fn drains_everything_pending_below_capacity() {
        let config = EngineConfig::default();
        let (mut tx, rx) = event::channel(4).unwrap();
        let mut engine = Engine::new(config, rx).unwrap();

        for note in 0..3u8 {
            assert!(tx.push(Event::note_on(60 + note, 100)));
        }
        block(&mut engine, 1);
        assert_eq!(engine.status().router.applied, 3);
    }

    /// Source that never runs dry.
    struct Flood {
        next: u16,
    }

    impl EventSource for Flood {
        fn pop(&mut self) -> Option<Event> {
            self.next = self.next.wrapping_add(1);
            Some(Event::param(Param::FilterCutoff, 200.0 + f32::from(self.next)))
        }

        fn capacity(&self) -> usize {
            8
        }
    }

    #[test]
    fn a_flooded_source_is_drained_one_capacity_per_block() {
        let mut engine = Engine::new(EngineConfig::default(), Flood { next: 0 }).unwrap();
        let mut out = vec![0.0; 32];

        engine.render(&mut out, 2);
        assert_eq!(engine.status().router.applied, 8);
        assert_eq!(engine.status().frames_rendered, 16);

        engine.render(&mut out, 2);
        assert_eq!(engine.status().router.applied, 16);
        assert_eq!(engine.params().cutoff, 216.0);
    }

    #[test]
    fn zero_channel_blocks_still_drain() {
        let (mut tx, mut engine) = engine();
        tx.push(Event::note_on(60, 100));
        engine.render(&mut [], 0);
        assert!(engine.status().gate);
        assert_eq!(engine.status().router.applied, 1);
    }

    #[test]
    fn unknown_and_inert_events_are_counted_as_ignored() {
        let (mut tx, mut engine) = engine();
        tx.push(Event::param_raw(910, 1.0));
        tx.push(Event::param_raw(12_345, 1.0));
        tx.push(Event::new(EventKind::PageSwitch, 2, 0.0));
        tx.push(Event::param(Param::MasterAmp, f32::NAN));
        tx.push(Event::param(Param::MasterAmp, 0.2));
        block(&mut engine, 8);

        let stats = engine.status().router;
        assert_eq!(stats.ignored, 4);
        assert_eq!(stats.applied, 1);
        assert_eq!(engine.status().master_amp, 0.2);
    }

    #[test]
    fn transport_stop_releases_all_voices() {
        let (mut tx, mut engine) = engine();
        tx.push(Event::note_on(60, 100));
        tx.push(Event::note_on(64, 100));
        block(&mut engine, 8);
        assert_eq!(engine.status().active_voices, 2);

        tx.push(Event::new(EventKind::Transport, event::TRANSPORT_STOP, 0.0));
        block(&mut engine, 8);
        assert_eq!(engine.status().active_voices, 0);
        assert!(!engine.status().gate);
    }

    #[test]
    fn transport_stop_cuts_effect_tails() {
        let (mut tx, mut engine) = engine();
        tx.push(Event::param(Param::DelayEnable, 1.0));
        tx.push(Event::param(Param::ReverbEnable, 1.0));
        tx.push(Event::param(Param::ChorusEnable, 1.0));
        tx.push(Event::note_on(60, 100));
        assert!(block(&mut engine, 4096).iter().any(|s| s.abs() > 1e-3));

        tx.push(Event::new(EventKind::Transport, event::TRANSPORT_STOP, 0.0));
        assert!(block(&mut engine, 512).iter().all(|s| *s == 0.0));
        assert_eq!(engine.status().envelope, 0.0);
    }

    #[test]
    fn all_notes_off_keeps_the_release_tail() {
        let (mut tx, mut engine) = engine();
        tx.push(Event::note_on(60, 100));
        block(&mut engine, 4096);

        tx.push(Event::all_notes_off());
        assert!(block(&mut engine, 64).iter().any(|s| s.abs() > 1e-4));
    }

    #[test]
    fn note_off_retunes_to_latest_held_note() {
        let (mut tx, mut engine) = engine();
        tx.push(Event::note_on(57, 100));
        tx.push(Event::note_on(69, 100));
        tx.push(Event::note_off(69));
        block(&mut engine, 8);
        assert!((engine.status().frequency - 220.0).abs() < 1e-3);
    }

    #[test]
    fn selector_switches_source() {
        let (mut tx, mut engine) = engine();
        tx.push(Event::param(Param::OscWave, 4.0));
        block(&mut engine, 1);
        assert_eq!(
            engine.status().source,
            SourceSelect::Oscillator(Waveform::Square)
        );

        tx.push(Event::param(Param::OscWave, 999.0));
        block(&mut engine, 1);
        assert_eq!(
            engine.status().source,
            SourceSelect::Oscillator(Waveform::Square)
        );
    }

    #[test]
    fn channel_layouts() {
        let (mut tx, mut engine) = engine();
        tx.push(Event::note_on(69, 100));

        let mut mono = vec![0.0; 64];
        engine.render(&mut mono, 1);
        assert!(mono.iter().any(|s| *s != 0.0));

        let mut quad = vec![1.0; 4 * 64 + 3];
        engine.render(&mut quad, 4);
        for frame in quad.chunks_exact(4) {
            assert_eq!(frame[2], 0.0);
            assert_eq!(frame[3], 0.0);
        }
        assert!(quad[256..].iter().all(|s| *s == 0.0));

        let mut none = vec![1.0; 8];
        engine.render(&mut none, 0);
        assert!(none.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn non_finite_source_output_never_reaches_the_buffer() {
        struct Broken;
        impl SoundSource for Broken {
            fn init(&mut self, _sample_rate: f32) {}
            fn set_frequency(&mut self, _frequency: f32) {}
            fn next_sample(&mut self) -> f32 {
                f32::INFINITY
            }
        }

        let (mut tx, engine) = engine();
        let mut engine = engine.with_macro(0, Box::new(Broken));
        tx.push(Event::param(Param::OscWave, SourceSelect::Macro(0).to_wire()));
        tx.push(Event::note_on(60, 100));
        let out = block(&mut engine, 512);
        assert!(out.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn rejects_invalid_config() {
        let (_, rx) = event::channel(4).unwrap();
        assert!(Engine::new(EngineConfig::default().sample_rate(0.0), rx).is_err());
    }
}
