//! Engine construction parameters.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, Result, DEFAULT_EVENT_CAPACITY, DEFAULT_SAMPLE_RATE};

/// Everything the render context needs to know before the first block.
///
/// Built with chained setters:
///
/// ```
/// use zynthora::EngineConfig;
///
/// let config = EngineConfig::new()
///     .sample_rate(44_100.0)
///     .event_capacity(256)
///     .declick(false);
/// assert!(config.validate().is_ok());
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Output sample rate in Hz.
    pub sample_rate: f32,
    /// Slots in the event ring; one slot is always kept free.
    pub event_capacity: usize,
    /// Reset paraphonic voice phases when a new phrase starts.
    pub declick: bool,
    /// Initial master amplitude.
    pub master_amp: f32,
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            declick: true,
            master_amp: 0.5,
            attack: 0.01,
            decay: 0.1,
            sustain: 0.8,
            release: 0.2,
        }
    }

    pub fn sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    pub fn declick(mut self, declick: bool) -> Self {
        self.declick = declick;
        self
    }

    pub fn master_amp(mut self, amp: f32) -> Self {
        self.master_amp = amp;
        self
    }

    /// Set the shared amplitude envelope (seconds, seconds, level, seconds).
    pub fn envelope(mut self, attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        self.attack = attack;
        self.decay = decay;
        self.sustain = sustain;
        self.release = release;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(Error::InvalidSampleRate(self.sample_rate));
        }
        if self.event_capacity < 2 {
            return Err(Error::InvalidCapacity(self.event_capacity));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
