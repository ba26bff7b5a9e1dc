//! Textual `command:value` protocol used by browser and script clients.
//!
//! ```text
//! note:60        wave:saw        cutoff:1200
//! gate:1         reverb:1        macro_timbre:0.4
//! ```

use crate::dsp::oscillator::{midi_to_freq, Waveform};
use crate::event::{Event, Param, SourceSelect};
use crate::{Error, Result};

/// Velocity used for notes started with `gate:1`.
pub const GATE_VELOCITY: u8 = 100;

const MACRO_PREFIXES: [&str; 3] = ["macro_", "braids_", "plaits_"];

/// Stateful decoder: `gate` plays whichever pitch was set last, either a
/// `note` or a raw `freq` in Hz.
#[derive(Debug, Clone)]
pub struct CommandDecoder {
    last_note: u8,
    /// Hz from a `freq` command that no later `note` has replaced.
    held_frequency: Option<f32>,
}

impl Default for CommandDecoder {
    fn default() -> Self {
        Self {
            last_note: 69,
            held_frequency: None,
        }
    }
}

impl CommandDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_note(&self) -> u8 {
        self.last_note
    }

    /// Decode one line into the events to send, in order. A blank line
    /// decodes to nothing.
    ///
    /// A NoteOn retunes the monophonic sources to its note, so `gate:1`
    /// after a `freq` command is followed by that frequency again.
    pub fn decode(&mut self, line: &str) -> Result<Vec<Event>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Vec::new());
        }

        let (command, raw) = line
            .split_once(':')
            .ok_or_else(|| Error::MissingSeparator(line.to_owned()))?;
        let (command, raw) = (command.trim(), raw.trim());

        if command == "wave" {
            let source = parse_source(raw)?;
            tracing::debug!(source = source.name(), "decoded source selection");
            return Ok(vec![Event::param(Param::OscWave, source.to_wire())]);
        }

        let param = match command {
            "note" => {
                let note = parse_note(command, raw)?;
                self.last_note = note;
                self.held_frequency = None;
                return Ok(vec![Event::param(Param::OscFreq, midi_to_freq(note as f32))]);
            }
            "freq" => {
                let frequency = parse_value(command, raw)?;
                self.held_frequency = Some(frequency);
                return Ok(vec![Event::param(Param::OscFreq, frequency)]);
            }
            "gate" => {
                if parse_value(command, raw)? <= 0.5 {
                    return Ok(vec![Event::note_off(self.last_note)]);
                }
                let mut events = vec![Event::note_on(self.last_note, GATE_VELOCITY)];
                if let Some(frequency) = self.held_frequency {
                    events.push(Event::param(Param::OscFreq, frequency));
                }
                return Ok(events);
            }
            "off" => return Ok(vec![Event::note_off(parse_note(command, raw)?)]),
            "panic" => return Ok(vec![Event::all_notes_off()]),

            "detune" => Param::OscDetune,
            "amp" => Param::MasterAmp,
            "cutoff" => Param::FilterCutoff,
            "res" => Param::FilterRes,
            "filter_env" => Param::FilterEnv,
            "filter" => Param::FilterEnable,
            "attack" => Param::AmpAttack,
            "decay" => Param::AmpDecay,
            "sustain" => Param::AmpSustain,
            "release" => Param::AmpRelease,
            "drive" => Param::Drive,

            "reverb" => Param::ReverbEnable,
            "chorus" => Param::ChorusEnable,
            "delay" => Param::DelayEnable,
            "master" => Param::MasterEnable,
            "dtime" => Param::DelayTime,
            "dfeed" => Param::DelayFeedback,
            "chorus_rate" => Param::ChorusRate,
            "chorus_depth" => Param::ChorusDepth,
            "reverb_time" => Param::ReverbTime,
            "reverb_tone" => Param::ReverbTone,

            "fm_ratio" => Param::FmRatio,
            "fm_index" => Param::FmIndex,
            "fm_enable" => Param::CustomFmEnable,
            "mod_wave" => Param::ModWave,
            "wt_index" => Param::WavetableMorph,
            "para_detune" | "logue_detune" => Param::ParaDetune,
            "para_oct" | "logue_oct" => Param::ParaOctave,

            other => macro_param(other).ok_or_else(|| Error::UnknownCommand(other.to_owned()))?,
        };

        let value = parse_value(command, raw)?;
        Ok(vec![Event::param(param, value)])
    }
}

fn parse_value(command: &str, raw: &str) -> Result<f32> {
    raw.parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::InvalidValue {
            command: command.to_owned(),
            value: raw.to_owned(),
        })
}

fn parse_note(command: &str, raw: &str) -> Result<u8> {
    let value = parse_value(command, raw)?;
    if (0.0..=127.0).contains(&value) {
        Ok(value.round() as u8)
    } else {
        Err(Error::InvalidValue {
            command: command.to_owned(),
            value: raw.to_owned(),
        })
    }
}

fn parse_source(name: &str) -> Result<SourceSelect> {
    Ok(match name {
        "sine" => SourceSelect::Oscillator(Waveform::Sine),
        "triangle" | "tri" => SourceSelect::Oscillator(Waveform::Triangle),
        "saw" => SourceSelect::Oscillator(Waveform::Saw),
        "square" => SourceSelect::Oscillator(Waveform::Square),
        "fm" => SourceSelect::Fm,
        "wavetable" => SourceSelect::Wavetable,
        "paraphonic" | "logue" => SourceSelect::Paraphonic,
        "macro-a" | "braids" => SourceSelect::Macro(0),
        "macro-b" | "plaits" => SourceSelect::Macro(1),
        other => return Err(Error::UnknownWaveform(other.to_owned())),
    })
}

fn macro_param(command: &str) -> Option<Param> {
    let suffix = MACRO_PREFIXES
        .iter()
        .find_map(|prefix| command.strip_prefix(prefix))?;

    Some(match suffix {
        "model" => Param::MacroModel,
        "timbre" => Param::MacroTimbre,
        "color" => Param::MacroColor,
        "morph" => Param::MacroMorph,
        "coarse" => Param::MacroCoarse,
        "fine" => Param::MacroFine,
        "fm" => Param::MacroFm,
        "modulation" | "mod" => Param::MacroModulation,
        "decay" => Param::MacroDecay,
        "harmonics" => Param::MacroHarmonics,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;

    fn decode(line: &str) -> Event {
        let events = CommandDecoder::new().decode(line).unwrap();
        assert_eq!(events.len(), 1, "{line}");
        events[0]
    }

    #[test]
    fn note_then_gate_plays_that_note() {
        let mut decoder = CommandDecoder::new();

        let tune = decoder.decode("note:57").unwrap();
        assert_eq!(tune[0].id, Param::OscFreq.id());
        assert!((tune[0].value - 220.0).abs() < 1e-3);

        let on = decoder.decode("gate:1").unwrap();
        assert_eq!(on.len(), 1);
        assert_eq!(on[0].kind, EventKind::NoteOn);
        assert_eq!(on[0].note(), Some(57));
        assert_eq!(on[0].velocity(), GATE_VELOCITY);

        let off = decoder.decode("gate:0").unwrap();
        assert_eq!(off[0].kind, EventKind::NoteOff);
        assert_eq!(off[0].note(), Some(57));
    }

    #[test]
    fn gate_after_freq_keeps_the_raw_frequency() {
        let mut decoder = CommandDecoder::new();
        decoder.decode("freq:220").unwrap();

        let on = decoder.decode("gate:1").unwrap();
        assert_eq!(on.len(), 2);
        assert_eq!(on[0].kind, EventKind::NoteOn);
        assert_eq!(on[1].id, Param::OscFreq.id());
        assert_eq!(on[1].value, 220.0);

        // a later note takes over again
        decoder.decode("note:60").unwrap();
        assert_eq!(decoder.decode("gate:1").unwrap().len(), 1);
    }

    #[test]
    fn blank_lines_decode_to_nothing() {
        let mut decoder = CommandDecoder::new();
        assert!(decoder.decode("").unwrap().is_empty());
        assert!(decoder.decode("   ").unwrap().is_empty());
    }

    #[test]
    fn numeric_commands_map_to_params() {
        let cases = [
            ("freq:330", Param::OscFreq, 330.0),
            ("amp:0.3", Param::MasterAmp, 0.3),
            ("cutoff:1200", Param::FilterCutoff, 1200.0),
            ("reverb:1", Param::ReverbEnable, 1.0),
            ("dtime:0.25", Param::DelayTime, 0.25),
            ("wt_index:12", Param::WavetableMorph, 12.0),
            ("logue_oct:-1", Param::ParaOctave, -1.0),
            ("plaits_harmonics:0.7", Param::MacroHarmonics, 0.7),
            ("braids_timbre:0.2", Param::MacroTimbre, 0.2),
        ];
        for (line, param, value) in cases {
            let event = decode(line);
            assert_eq!(event.kind, EventKind::ParamChange, "{line}");
            assert_eq!(event.id, param.id(), "{line}");
            assert_eq!(event.value, value, "{line}");
        }
    }

    #[test]
    fn wave_names_encode_selectors() {
        let event = decode("wave:paraphonic");
        assert_eq!(
            SourceSelect::from_wire(event.value),
            Some(SourceSelect::Paraphonic)
        );
        assert_eq!(
            SourceSelect::from_wire(decode("wave:saw").value),
            Some(SourceSelect::Oscillator(Waveform::Saw))
        );
    }

    #[test]
    fn off_releases_a_specific_note() {
        let event = decode("off:64");
        assert_eq!(event.kind, EventKind::NoteOff);
        assert_eq!(event.note(), Some(64));
    }

    #[test]
    fn malformed_lines_are_errors() {
        let mut decoder = CommandDecoder::new();
        assert!(matches!(
            decoder.decode("cutoff 100"),
            Err(Error::MissingSeparator(_))
        ));
        assert!(matches!(
            decoder.decode("warp:9"),
            Err(Error::UnknownCommand(_))
        ));
        assert!(matches!(
            decoder.decode("cutoff:loud"),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(
            decoder.decode("wave:noise"),
            Err(Error::UnknownWaveform(_))
        ));
        assert!(matches!(
            decoder.decode("note:200"),
            Err(Error::InvalidValue { .. })
        ));
        assert_eq!(decoder.last_note(), 69);
    }
}
