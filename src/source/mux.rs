use crate::dsp::sanitize;
use crate::event::{Param, SourceSelect};
use crate::source::{
    FmPair, OscillatorSource, ParaphonicSaw, RenderCtx, SoundSource, WavetableSource,
};

pub const MACRO_SLOTS: usize = 2;

/// Holds every sound-source variant and renders the selected one.
///
/// Built-in variants are stored inline and dispatched by tag. Switching is a
/// plain assignment of the selector and takes effect on the next sample with
/// no crossfade. Parameters and pitch are forwarded to every variant so a
/// newly selected source already has the current settings.
pub struct SoundSourceMux {
    active: SourceSelect,
    oscillator: OscillatorSource,
    fm: FmPair,
    wavetable: WavetableSource,
    paraphonic: ParaphonicSaw,
    macros: [Option<Box<dyn SoundSource>>; MACRO_SLOTS],
    sample_rate: f32,
}

impl SoundSourceMux {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            active: SourceSelect::default(),
            oscillator: OscillatorSource::new(sample_rate),
            fm: FmPair::new(sample_rate),
            wavetable: WavetableSource::new(sample_rate),
            paraphonic: ParaphonicSaw::new(sample_rate),
            macros: [None, None],
            sample_rate,
        }
    }

    /// Install an external engine in a macro slot. Returns the previous
    /// occupant. Must be called from the control context before rendering.
    pub fn install_macro(
        &mut self,
        slot: usize,
        mut engine: Box<dyn SoundSource>,
    ) -> Option<Box<dyn SoundSource>> {
        engine.init(self.sample_rate);
        match self.macros.get_mut(slot) {
            Some(existing) => existing.replace(engine),
            None => Some(engine),
        }
    }

    pub fn has_macro(&self, slot: usize) -> bool {
        matches!(self.macros.get(slot), Some(Some(_)))
    }

    pub fn select(&mut self, select: SourceSelect) {
        if let SourceSelect::Oscillator(waveform) = select {
            self.oscillator.set_waveform(waveform);
        }
        self.active = select;
    }

    pub fn active(&self) -> SourceSelect {
        self.active
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.oscillator.set_frequency(frequency);
        self.fm.set_frequency(frequency);
        self.wavetable.set_frequency(frequency);
        for engine in self.macros.iter_mut().flatten() {
            engine.set_frequency(frequency);
        }
    }

    pub fn set_param(&mut self, param: Param, value: f32) {
        match param {
            Param::FmRatio | Param::FmIndex => {
                self.oscillator.set_param(param, value);
                self.fm.set_param(param, value);
            }
            Param::CustomFmEnable | Param::ModWave => self.oscillator.set_param(param, value),
            Param::WavetableMorph => self.wavetable.set_param(param, value),
            Param::ParaOctave => self.paraphonic.set_param(param, value),
            Param::MacroModel
            | Param::MacroTimbre
            | Param::MacroColor
            | Param::MacroMorph
            | Param::MacroCoarse
            | Param::MacroFine
            | Param::MacroFm
            | Param::MacroModulation
            | Param::MacroDecay
            | Param::MacroHarmonics => {
                for engine in self.macros.iter_mut().flatten() {
                    engine.set_param(param, value);
                }
            }
            _ => {}
        }
    }

    /// A note started: retrigger the selected variant.
    pub fn trigger(&mut self) {
        self.with_active(|source| source.trigger());
    }

    /// Zero paraphonic phases at the start of a phrase.
    pub fn declick(&mut self) {
        self.paraphonic.reset();
    }

    pub fn prepare(&mut self, ctx: &RenderCtx<'_>) {
        self.with_active(|source| source.prepare(ctx));
    }

    /// One sample from the selected variant, with non-finite output
    /// replaced by silence. An empty macro slot renders silence.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let sample = match self.active {
            SourceSelect::Oscillator(_) => self.oscillator.next_sample(),
            SourceSelect::Fm => self.fm.next_sample(),
            SourceSelect::Wavetable => self.wavetable.next_sample(),
            SourceSelect::Paraphonic => self.paraphonic.next_sample(),
            SourceSelect::Macro(slot) => match self.macros.get_mut(slot as usize) {
                Some(Some(engine)) => engine.next_sample(),
                _ => 0.0,
            },
        };
        sanitize(sample)
    }

    fn with_active(&mut self, f: impl FnOnce(&mut dyn SoundSource)) {
        match self.active {
            SourceSelect::Oscillator(_) => f(&mut self.oscillator),
            SourceSelect::Fm => f(&mut self.fm),
            SourceSelect::Wavetable => f(&mut self.wavetable),
            SourceSelect::Paraphonic => f(&mut self.paraphonic),
            SourceSelect::Macro(slot) => {
                if let Some(Some(engine)) = self.macros.get_mut(slot as usize) {
                    f(engine.as_mut());
                }
            }
        }
    }
}
