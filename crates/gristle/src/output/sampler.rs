//! Probabilistic suppression of output writes.

use std::fmt;

/// Share of records a destination writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleRate {
    /// Write every record.
    #[default]
    Always,
    /// Write roughly this percentage (0-100) of records.
    Percent(u8),
}

impl SampleRate {
    /// Sentinel accepted on the command line for [`SampleRate::Always`].
    pub const UNLIMITED: i32 = -1;

    /// Build from a percentage in `0..=100`, or `-1` for no sampling.
    pub fn from_percent(percent: i32) -> Result<Self, String> {
        match percent {
            Self::UNLIMITED => Ok(SampleRate::Always),
            0..=100 => Ok(SampleRate::Percent(percent as u8)),
            _ => Err(format!(
                "sampling percentage must be -1 or between 0 and 100, got {}",
                percent
            )),
        }
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleRate::Always => write!(f, "all"),
            SampleRate::Percent(p) => write!(f, "{}%", p),
        }
    }
}

/// Draws the per-record sampling decisions.
///
/// Runs are reproducible only when seeded.
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: fastrand::Rng,
}

impl Sampler {
    /// Create a sampler seeded from the process-wide source.
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    /// Create a deterministic sampler.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Decide whether one record is written at the given rate.
    ///
    /// A fresh uniform draw in `[0, 100)` is taken for every sampled decision.
    pub fn should_write(&mut self, rate: SampleRate) -> bool {
        match rate {
            SampleRate::Always => true,
            SampleRate::Percent(p) => self.rng.f64() * 100.0 < f64::from(p),
        }
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}
