//! The flat parameter id namespace.
//!
//! Ranges are partitioned by subsystem and must stay stable: independent
//! control surfaces address the same running instance by these numbers.
//!
//! | range   | subsystem                         |
//! | ------- | --------------------------------- |
//! | 100-199 | oscillator, filter, envelope, drive |
//! | 200-299 | FM, wavetable, paraphonic, macro  |
//! | 300-399 | chorus, delay, reverb             |
//! | 900-999 | mixer / global                    |

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::oscillator::Waveform;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Param {
    /// Active sound source selector, see [`SourceSelect::from_wire`]
    OscWave = 100,
    /// Frequency in Hz for the monophonic sources
    OscFreq = 101,
    /// Alias of [`Param::ParaDetune`]
    OscDetune = 102,

    /// Cutoff in Hz
    FilterCutoff = 110,
    /// Resonance 0.0 - 1.0
    FilterRes = 111,
    /// Envelope to cutoff depth 0.0 - 1.0
    FilterEnv = 112,
    FilterEnable = 113,

    AmpAttack = 120,
    AmpDecay = 121,
    AmpSustain = 122,
    AmpRelease = 123,

    /// Drive amount; values above 0.01 also enable the stage
    Drive = 130,
    DriveEnable = 131,

    FmRatio = 200,
    FmIndex = 201,
    /// Linear FM of the basic oscillator by a second oscillator
    CustomFmEnable = 202,
    ModWave = 203,

    /// Wavetable position 0.0 - 63.0
    WavetableMorph = 210,

    /// Paraphonic unison spread 0.0 - 1.0
    ParaDetune = 220,
    /// Paraphonic octave shift -2..=2
    ParaOctave = 221,

    MacroModel = 230,
    MacroTimbre = 231,
    MacroColor = 232,
    MacroMorph = 233,
    MacroCoarse = 234,
    MacroFine = 235,
    MacroFm = 236,
    MacroModulation = 237,
    MacroDecay = 238,
    MacroHarmonics = 239,

    ChorusEnable = 300,
    /// Delay time in seconds
    DelayTime = 301,
    DelayFeedback = 302,
    /// Chorus LFO rate in Hz
    ChorusRate = 310,
    ChorusDepth = 311,
    /// Reverb feedback 0.0 - 1.0
    ReverbTime = 320,
    /// Reverb low-pass in Hz
    ReverbTone = 321,

    ReverbEnable = 920,
    DelayEnable = 921,
    MasterEnable = 998,
    MasterAmp = 999,
}

impl Param {
    pub const fn id(self) -> u16 {
        self as u16
    }

    /// Table lookup used by the router. Unknown ids map to `None` so newer
    /// clients can talk to older engines.
    pub fn from_id(id: u16) -> Option<Self> {
        use Param::*;

        Some(match id {
            100 => OscWave,
            101 => OscFreq,
            102 => OscDetune,
            110 => FilterCutoff,
            111 => FilterRes,
            112 => FilterEnv,
            113 => FilterEnable,
            120 => AmpAttack,
            121 => AmpDecay,
            122 => AmpSustain,
            123 => AmpRelease,
            130 => Drive,
            131 => DriveEnable,
            200 => FmRatio,
            201 => FmIndex,
            202 => CustomFmEnable,
            203 => ModWave,
            210 => WavetableMorph,
            220 => ParaDetune,
            221 => ParaOctave,
            230 => MacroModel,
            231 => MacroTimbre,
            232 => MacroColor,
            233 => MacroMorph,
            234 => MacroCoarse,
            235 => MacroFine,
            236 => MacroFm,
            237 => MacroModulation,
            238 => MacroDecay,
            239 => MacroHarmonics,
            300 => ChorusEnable,
            301 => DelayTime,
            302 => DelayFeedback,
            310 => ChorusRate,
            311 => ChorusDepth,
            320 => ReverbTime,
            321 => ReverbTone,
            920 => ReverbEnable,
            921 => DelayEnable,
            998 => MasterEnable,
            999 => MasterAmp,
            _ => return None,
        })
    }
}

/// Boolean parameters arrive as floats; anything above one half is "on".
#[inline]
pub fn as_toggle(value: f32) -> bool {
    value > 0.5
}

/// Which sound source is rendering.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceSelect {
    /// Band-limited oscillator with the given waveform
    Oscillator(Waveform),
    /// Two-operator FM pair
    Fm,
    Wavetable,
    Paraphonic,
    /// External macro-oscillator engine in slot 0 or 1
    Macro(u8),
}

impl SourceSelect {
    pub const WIRE_FM: u16 = 100;
    pub const WIRE_WAVETABLE: u16 = 101;
    pub const WIRE_PARAPHONIC: u16 = 102;
    pub const WIRE_MACRO_A: u16 = 103;
    pub const WIRE_MACRO_B: u16 = 104;

    /// Decode the selector value of [`Param::OscWave`].
    ///
    /// Low values follow the classic waveform numbering used by existing
    /// clients, where several codes name variants of the same shape.
    pub fn from_wire(value: f32) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }

        Some(match value.round() as u16 {
            0 => SourceSelect::Oscillator(Waveform::Sine),
            1 | 5 => SourceSelect::Oscillator(Waveform::Triangle),
            2 | 3 | 6 => SourceSelect::Oscillator(Waveform::Saw),
            4 | 7 => SourceSelect::Oscillator(Waveform::Square),
            Self::WIRE_FM => SourceSelect::Fm,
            Self::WIRE_WAVETABLE => SourceSelect::Wavetable,
            Self::WIRE_PARAPHONIC => SourceSelect::Paraphonic,
            Self::WIRE_MACRO_A => SourceSelect::Macro(0),
            Self::WIRE_MACRO_B => SourceSelect::Macro(1),
            _ => return None,
        })
    }

    pub fn to_wire(self) -> f32 {
        let code = match self {
            SourceSelect::Oscillator(Waveform::Sine) => 0,
            SourceSelect::Oscillator(Waveform::Triangle) => 5,
            SourceSelect::Oscillator(Waveform::Saw) => 6,
            SourceSelect::Oscillator(Waveform::Square) => 7,
            SourceSelect::Fm => Self::WIRE_FM,
            SourceSelect::Wavetable => Self::WIRE_WAVETABLE,
            SourceSelect::Paraphonic => Self::WIRE_PARAPHONIC,
            SourceSelect::Macro(0) => Self::WIRE_MACRO_A,
            SourceSelect::Macro(_) => Self::WIRE_MACRO_B,
        };
        code as f32
    }

    pub fn name(self) -> &'static str {
        match self {
            SourceSelect::Oscillator(Waveform::Sine) => "sine",
            SourceSelect::Oscillator(Waveform::Triangle) => "triangle",
            SourceSelect::Oscillator(Waveform::Saw) => "saw",
            SourceSelect::Oscillator(Waveform::Square) => "square",
            SourceSelect::Fm => "fm",
            SourceSelect::Wavetable => "wavetable",
            SourceSelect::Paraphonic => "paraphonic",
            SourceSelect::Macro(0) => "macro-a",
            SourceSelect::Macro(_) => "macro-b",
        }
    }
}

impl Default for SourceSelect {
    fn default() -> Self {
        SourceSelect::Oscillator(Waveform::Sine)
    }
}
