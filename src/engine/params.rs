use crate::config::EngineConfig;
use crate::effects::{Stage, StageFlags};
use crate::event::{as_toggle, Param, SourceSelect};

const MACRO_PARAMS: usize = 10;

/// Last-applied value of every parameter.
///
/// Owned by the render context. Only the router writes it; the render loop,
/// the status snapshot and tests read it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineParams {
    pub source: SourceSelect,
    pub frequency: f32,
    pub detune: f32,

    pub cutoff: f32,
    pub resonance: f32,
    pub filter_env: f32,

    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,

    pub drive: f32,

    pub fm_ratio: f32,
    pub fm_index: f32,
    pub custom_fm: bool,
    pub mod_wave: f32,
    pub wavetable_morph: f32,
    pub para_octave: f32,
    pub macros: [f32; MACRO_PARAMS],

    pub chorus_rate: f32,
    pub chorus_depth: f32,
    pub delay_time: f32,
    pub delay_feedback: f32,
    pub reverb_time: f32,
    pub reverb_tone: f32,

    pub stages: StageFlags,
    pub master_amp: f32,
}

impl EngineParams {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            source: SourceSelect::default(),
            frequency: 440.0,
            detune: 0.0,

            cutoff: 20_000.0,
            resonance: 0.0,
            filter_env: 0.0,

            attack: config.attack,
            decay: config.decay,
            sustain: config.sustain,
            release: config.release,

            drive: 0.0,

            fm_ratio: 2.0,
            fm_index: 1.0,
            custom_fm: false,
            mod_wave: 0.0,
            wavetable_morph: 0.0,
            para_octave: 0.0,
            macros: [0.0; MACRO_PARAMS],

            chorus_rate: 0.5,
            chorus_depth: 0.8,
            delay_time: 0.35,
            delay_feedback: 0.4,
            reverb_time: 0.85,
            reverb_tone: 10_000.0,

            stages: StageFlags::default(),
            master_amp: config.master_amp,
        }
    }

    /// Record a new value. Selector values that do not decode leave the
    /// current source untouched and return `false`.
    pub fn store(&mut self, param: Param, value: f32) -> bool {
        match param {
            Param::OscWave => match SourceSelect::from_wire(value) {
                Some(select) => self.source = select,
                None => return false,
            },
            Param::OscFreq => self.frequency = value,
            Param::OscDetune | Param::ParaDetune => self.detune = value.clamp(0.0, 1.0),

            Param::FilterCutoff => self.cutoff = value,
            Param::FilterRes => self.resonance = value,
            Param::FilterEnv => self.filter_env = value,

            Param::AmpAttack => self.attack = value,
            Param::AmpDecay => self.decay = value,
            Param::AmpSustain => self.sustain = value,
            Param::AmpRelease => self.release = value,

            Param::Drive => {
                self.drive = value;
                self.stages.drive = value > 0.01;
            }

            Param::FmRatio => self.fm_ratio = value,
            Param::FmIndex => self.fm_index = value,
            Param::CustomFmEnable => self.custom_fm = as_toggle(value),
            Param::ModWave => self.mod_wave = value,
            Param::WavetableMorph => self.wavetable_morph = value,
            Param::ParaOctave => self.para_octave = value,

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
                let index = (param.id() - Param::MacroModel.id()) as usize;
                self.macros[index] = value;
            }

            Param::ChorusRate => self.chorus_rate = value,
            Param::ChorusDepth => self.chorus_depth = value,
            Param::DelayTime => self.delay_time = value,
            Param::DelayFeedback => self.delay_feedback = value,
            Param::ReverbTime => self.reverb_time = value,
            Param::ReverbTone => self.reverb_tone = value,

            Param::DriveEnable => self.stages.set(Stage::Drive, as_toggle(value)),
            Param::FilterEnable => self.stages.set(Stage::Filter, as_toggle(value)),
            Param::ChorusEnable => self.stages.set(Stage::Chorus, as_toggle(value)),
            Param::DelayEnable => self.stages.set(Stage::Delay, as_toggle(value)),
            Param::ReverbEnable => self.stages.set(Stage::Reverb, as_toggle(value)),
            Param::MasterEnable => self.stages.set(Stage::Master, as_toggle(value)),

            Param::MasterAmp => self.master_amp = value,
        }
        true
    }
}
