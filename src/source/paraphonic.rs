use crate::dsp::oscillator::{midi_to_freq, waveform_at, Waveform};
use crate::event::Param;
use crate::source::{RenderCtx, SoundSource};
use crate::VOICE_COUNT;

/*
Paraphonic saw
==============

One band-limited saw per pool voice, pitched from the allocator's snapshot
(note + octave shift + quantized detune). The mix is accumulated with a
running 0.8 scale so later voices weigh slightly more, then hard-limited
to [-1, 1]. Idle voices are silent and hold their phase at zero so a new
note always starts from the same point.

Pitches are computed once per block in `prepare`; the per-sample loop only
advances phases.
*/

const MIX_SCALE: f32 = 0.8;

pub struct ParaphonicSaw {
    phases: [f32; VOICE_COUNT],
    increments: [f32; VOICE_COUNT],
    active: [bool; VOICE_COUNT],
    octave: i8,
    sample_rate: f32,
}

impl ParaphonicSaw {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phases: [0.0; VOICE_COUNT],
            increments: [0.0; VOICE_COUNT],
            active: [false; VOICE_COUNT],
            octave: 0,
            sample_rate,
        }
    }

    pub fn octave(&self) -> i8 {
        self.octave
    }

    pub fn phases(&self) -> &[f32; VOICE_COUNT] {
        &self.phases
    }
}

impl SoundSource for ParaphonicSaw {
    fn init(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.reset();
    }

    /// Pitch comes from the voice pool.
    fn set_frequency(&mut self, _frequency: f32) {}

    fn set_param(&mut self, param: Param, value: f32) {
        if param == Param::ParaOctave && value.is_finite() {
            self.octave = value.round().clamp(-2.0, 2.0) as i8;
        }
    }

    fn prepare(&mut self, ctx: &RenderCtx<'_>) {
        let nyquist = self.sample_rate * 0.5;
        for (slot, voice) in ctx.voices.iter().take(VOICE_COUNT).enumerate() {
            match voice.pitch(self.octave) {
                Some(pitch) => {
                    self.active[slot] = true;
                    self.increments[slot] = midi_to_freq(pitch).min(nyquist) / self.sample_rate;
                }
                None => {
                    self.active[slot] = false;
                    self.increments[slot] = 0.0;
                }
            }
        }
        for slot in ctx.voices.len().min(VOICE_COUNT)..VOICE_COUNT {
            self.active[slot] = false;
        }
    }

    #[inline]
    fn next_sample(&mut self) -> f32 {
        let mut mix = 0.0;
        for slot in 0..VOICE_COUNT {
            if self.active[slot] {
                let phase = self.phases[slot];
                mix = (mix + waveform_at(Waveform::Saw, phase, self.increments[slot])) * MIX_SCALE;

                let next = phase + self.increments[slot];
                self.phases[slot] = next - next.floor();
            } else {
                self.phases[slot] = 0.0;
            }
        }
        mix.clamp(-1.0, 1.0)
    }

    fn reset(&mut self) {
        self.phases = [0.0; VOICE_COUNT];
    }
}
