//! Fixed-order effect chain: drive -> filter -> chorus -> delay -> reverb ->
//! master gain.
//!
//! Each stage has an enable flag. A disabled stage is skipped entirely: its
//! `process` is not called, its state does not advance, and the signal passes
//! through untouched with no added latency.

pub mod chorus;
pub mod delay;
pub mod drive;
pub mod filter;
pub mod gain;
pub mod reverb;

pub use chorus::Chorus;
pub use delay::StereoDelay;
pub use drive::Drive;
pub use filter::EnvelopeFilter;
pub use gain::MasterGain;
pub use reverb::StereoReverb;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::event::Param;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StereoFrame {
    pub left: f32,
    pub right: f32,
}

impl StereoFrame {
    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    pub fn mono(sample: f32) -> Self {
        Self::new(sample, sample)
    }
}

/// Chain positions, in processing order.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Drive,
    Filter,
    Chorus,
    Delay,
    Reverb,
    Master,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Drive,
        Stage::Filter,
        Stage::Chorus,
        Stage::Delay,
        Stage::Reverb,
        Stage::Master,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Drive => "drive",
            Stage::Filter => "filter",
            Stage::Chorus => "chorus",
            Stage::Delay => "delay",
            Stage::Reverb => "reverb",
            Stage::Master => "master",
        }
    }

    /// The parameter id that toggles this stage.
    pub fn toggle_param(self) -> Param {
        match self {
            Stage::Drive => Param::DriveEnable,
            Stage::Filter => Param::FilterEnable,
            Stage::Chorus => Param::ChorusEnable,
            Stage::Delay => Param::DelayEnable,
            Stage::Reverb => Param::ReverbEnable,
            Stage::Master => Param::MasterEnable,
        }
    }
}

/// Per-stage enable flags.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageFlags {
    pub drive: bool,
    pub filter: bool,
    pub chorus: bool,
    pub delay: bool,
    pub reverb: bool,
    pub master: bool,
}

impl Default for StageFlags {
    fn default() -> Self {
        Self {
            drive: false,
            filter: true,
            chorus: false,
            delay: false,
            reverb: false,
            master: true,
        }
    }
}

impl StageFlags {
    pub const NONE: StageFlags = StageFlags {
        drive: false,
        filter: false,
        chorus: false,
        delay: false,
        reverb: false,
        master: false,
    };

    pub fn get(&self, stage: Stage) -> bool {
        match stage {
            Stage::Drive => self.drive,
            Stage::Filter => self.filter,
            Stage::Chorus => self.chorus,
            Stage::Delay => self.delay,
            Stage::Reverb => self.reverb,
            Stage::Master => self.master,
        }
    }

    pub fn set(&mut self, stage: Stage, enabled: bool) {
        let flag = match stage {
            Stage::Drive => &mut self.drive,
            Stage::Filter => &mut self.filter,
            Stage::Chorus => &mut self.chorus,
            Stage::Delay => &mut self.delay,
            Stage::Reverb => &mut self.reverb,
            Stage::Master => &mut self.master,
        };
        *flag = enabled;
    }

    pub fn only(stage: Stage) -> Self {
        let mut flags = Self::NONE;
        flags.set(stage, true);
        flags
    }
}

pub struct EffectChain {
    pub drive: Drive,
    pub filter: EnvelopeFilter,
    pub chorus: Chorus,
    pub delay: StereoDelay,
    pub reverb: StereoReverb,
    pub master: MasterGain,
}

impl EffectChain {
    /// Allocates every delay buffer up front.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            drive: Drive::new(),
            filter: EnvelopeFilter::new(sample_rate),
            chorus: Chorus::new(sample_rate),
            delay: StereoDelay::new(sample_rate),
            reverb: StereoReverb::new(sample_rate),
            master: MasterGain::new(),
        }
    }

    /// Forward a parameter to the stage that owns it. Returns `false` for
    /// parameters no stage handles.
    pub fn set_param(&mut self, param: Param, value: f32) -> bool {
        match param {
            Param::Drive => self.drive.set_amount(value),
            Param::FilterCutoff => self.filter.set_cutoff(value),
            Param::FilterRes => self.filter.set_resonance(value),
            Param::FilterEnv => self.filter.set_env_depth(value),
            Param::ChorusRate => self.chorus.set_rate(value),
            Param::ChorusDepth => self.chorus.set_depth(value),
            Param::DelayTime => self.delay.set_time(value),
            Param::DelayFeedback => self.delay.set_feedback(value),
            Param::ReverbTime => self.reverb.set_time(value),
            Param::ReverbTone => self.reverb.set_tone(value),
            Param::MasterAmp => self.master.set_amp(value),
            _ => return false,
        }
        true
    }

    /// Run one mono sample through every enabled stage.
    ///
    /// `envelope` is the shared envelope level, used by the filter's
    /// envelope modulation.
    #[inline]
    pub fn process(&mut self, input: f32, envelope: f32, flags: &StageFlags) -> StereoFrame {
        let mut mono = input;
        if flags.drive {
            mono = self.drive.process(mono);
        }
        if flags.filter {
            mono = self.filter.process(mono, envelope);
        }

        let mut frame = StereoFrame::mono(mono);
        if flags.chorus {
            frame = self.chorus.process(frame);
        }
        if flags.delay {
            frame = self.delay.process(frame);
        }
        if flags.reverb {
            frame = self.reverb.process(frame);
        }
        if flags.master {
            frame = self.master.process(frame);
        }
        frame
    }

    pub fn reset(&mut self) {
        self.filter.reset();
        self.chorus.reset();
        self.delay.reset();
        self.reverb.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    fn test_signal(n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| 0.6 * (TAU * 220.0 * i as f32 / 48_000.0).sin() + if i % 97 == 0 { 0.3 } else { 0.0 })
            .collect()
    }

    fn configured_chain() -> EffectChain {
        let mut chain = EffectChain::new(48_000.0);
        chain.set_param(Param::Drive, 0.7);
        chain.set_param(Param::FilterCutoff, 800.0);
        chain.set_param(Param::FilterRes, 0.6);
        chain.set_param(Param::ChorusDepth, 1.0);
        chain.set_param(Param::DelayTime, 0.01);
        chain.set_param(Param::DelayFeedback, 0.5);
        chain.set_param(Param::ReverbTime, 0.9);
        chain.set_param(Param::MasterAmp, 0.3);
        chain
    }

    #[test]
    fn fully_bypassed_chain_is_identity() {
        let mut chain = configured_chain();
        for &sample in &test_signal(4_800) {
            let out = chain.process(sample, 1.0, &StageFlags::NONE);
            assert_eq!(out, StereoFrame::mono(sample));
        }
    }

    #[test]
    fn each_enabled_stage_changes_the_signal() {
        for stage in Stage::ALL {
            let mut chain = configured_chain();
            let flags = StageFlags::only(stage);
            let differs = test_signal(4_800)
                .into_iter()
                .any(|sample| chain.process(sample, 1.0, &flags) != StereoFrame::mono(sample));
            assert!(differs, "{} had no effect", stage.name());
        }
    }

    #[test]
    fn disabled_stage_state_does_not_advance() {
        let signal = test_signal(2_000);
        for stage in Stage::ALL {
            let mut bypassed = configured_chain();
            let mut fresh = configured_chain();
            for &sample in &signal {
                bypassed.process(sample, 0.5, &StageFlags::NONE);
            }

            let flags = StageFlags::only(stage);
            for &sample in &signal {
                assert_eq!(
                    bypassed.process(sample, 0.5, &flags),
                    fresh.process(sample, 0.5, &flags),
                    "{} advanced while disabled",
                    stage.name()
                );
            }
        }
    }

    #[test]
    fn unknown_params_are_not_consumed() {
        let mut chain = EffectChain::new(48_000.0);
        assert!(!chain.set_param(Param::OscFreq, 1.0));
        assert!(!chain.set_param(Param::ReverbEnable, 1.0));
        assert!(chain.set_param(Param::ReverbTone, 5_000.0));
    }

    #[test]
    fn stage_flags_round_trip() {
        let mut flags = StageFlags::NONE;
        for stage in Stage::ALL {
            assert!(!flags.get(stage));
            flags.set(stage, true);
            assert!(flags.get(stage));
        }
        assert!(StageFlags::only(Stage::Delay).delay);
        assert_eq!(Stage::Reverb.toggle_param(), Param::ReverbEnable);
    }
}
