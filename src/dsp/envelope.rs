use crate::MIN_TIME;

/*
Gate-Driven ADSR
================

One envelope shapes the whole instrument. Instead of explicit note_on /
note_off calls it watches a gate level every sample:

  gate rising edge   restart Attack from the current level
  gate falling edge  start Release from the current level
  gate held high     Attack -> Decay -> Sustain
  gate held low      Release -> Idle

Restarting attack from the current level (rather than from zero) keeps
legato retriggers and voice steals click-free.

  Level
    1.0 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        Attack Decay  Sustain  Release

Segments are linear. The per-sample step is

    step = span / (time_seconds * sample_rate)

and is recomputed each sample so parameter changes take effect mid-segment.
Release snapshots its start level so it lands exactly on zero.
*/

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

pub struct Envelope {
    attack_time: f32,
    decay_time: f32,
    sustain_level: f32,
    release_time: f32,
    sample_rate: f32,

    stage: EnvelopeStage,
    level: f32,
    gate: bool,

    release_start_level: f32,
    release_total_samples: u32,
    release_elapsed_samples: u32,
}

impl Envelope {
    pub fn new(sample_rate: f32) -> Self {
        Self::adsr(sample_rate, 0.01, 0.1, 0.8, 0.2)
    }

    pub fn adsr(sample_rate: f32, attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        let mut env = Self {
            attack_time: MIN_TIME,
            decay_time: MIN_TIME,
            sustain_level: 1.0,
            release_time: MIN_TIME,
            sample_rate,

            stage: EnvelopeStage::Idle,
            level: 0.0,
            gate: false,

            release_start_level: 0.0,
            release_total_samples: 1,
            release_elapsed_samples: 0,
        };
        env.set_attack(attack);
        env.set_decay(decay);
        env.set_sustain(sustain);
        env.set_release(release);
        env
    }

    pub fn set_attack(&mut self, seconds: f32) {
        self.attack_time = clamp_time(seconds);
    }

    pub fn set_decay(&mut self, seconds: f32) {
        self.decay_time = clamp_time(seconds);
    }

    pub fn set_sustain(&mut self, level: f32) {
        if level.is_finite() {
            self.sustain_level = level.clamp(0.0, 1.0);
        }
    }

    pub fn set_release(&mut self, seconds: f32) {
        self.release_time = clamp_time(seconds);
    }

    /// Advance one sample with the given gate and return the new level.
    pub fn process(&mut self, gate: bool) -> f32 {
        if gate != self.gate {
            self.gate = gate;
            if gate {
                self.stage = EnvelopeStage::Attack;
            } else if self.stage != EnvelopeStage::Idle {
                self.begin_release();
            }
        }

        match self.stage {
            EnvelopeStage::Idle => {
                self.level = 0.0;
            }

            EnvelopeStage::Attack => {
                self.level += 1.0 / (self.attack_time * self.sample_rate);
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeStage::Decay;
                }
            }

            EnvelopeStage::Decay => {
                let target = self.sustain_level;
                self.level -= (1.0 - target) / (self.decay_time * self.sample_rate);
                if self.level <= target {
                    self.level = target;
                    self.stage = EnvelopeStage::Sustain;
                }
            }

            EnvelopeStage::Sustain => {
                self.level = self.sustain_level;
            }

            EnvelopeStage::Release => {
                self.release_elapsed_samples = self.release_elapsed_samples.saturating_add(1);
                let progress =
                    self.release_elapsed_samples as f32 / self.release_total_samples as f32;
                self.level = (self.release_start_level * (1.0 - progress)).max(0.0);

                if self.release_elapsed_samples >= self.release_total_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    fn begin_release(&mut self) {
        self.release_start_level = self.level;
        self.release_total_samples = (self.release_time * self.sample_rate).round().max(1.0) as u32;
        self.release_elapsed_samples = 0;
        self.stage = EnvelopeStage::Release;
    }

    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.level = 0.0;
        self.gate = false;
        self.release_elapsed_samples = 0;
        self.release_start_level = 0.0;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }
}

fn clamp_time(seconds: f32) -> f32 {
    if seconds.is_finite() {
        seconds.clamp(MIN_TIME, 30.0)
    } else {
        MIN_TIME
    }
}
