use serde::{Deserialize, Serialize};

use crate::error::TimerError;

pub const MIN_DURATION_MS: i64 = 5_000;
pub const MAX_DURATION_MS: i64 = 3_600_000;
pub const DURATION_STEP_MS: i64 = 5_000;

const DEFAULT_DURATION_MS: i64 = 25 * 60_000;

/// Countdown length: 5s..=60min in 5s increments.
///
/// The lenient constructors round to the nearest step and clamp into range,
/// which is how the duration dial and `configure` behave. `try_from_ms` is
/// the strict variant used when parsing stored or user-typed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct TimerDuration(i64);

impl TimerDuration {
    pub const MIN: Self = Self(MIN_DURATION_MS);
    pub const MAX: Self = Self(MAX_DURATION_MS);

    /// Round `minutes` to the nearest 5s step, then clamp.
    pub fn from_minutes(minutes: f64) -> Self {
        // `as` saturates and maps NaN to 0, which the clamp then absorbs.
        Self::from_secs((minutes * 60.0).round() as i64)
    }

    /// Round whole seconds to the nearest 5s step, then clamp.
    pub fn from_secs(secs: i64) -> Self {
        let step_secs = DURATION_STEP_MS / 1000;
        let stepped = (secs as f64 / step_secs as f64).round() as i64 * step_secs;
        Self((stepped * 1000).clamp(MIN_DURATION_MS, MAX_DURATION_MS))
    }

    /// Accept only in-range multiples of the step.
    pub fn try_from_ms(ms: i64) -> Result<Self, TimerError> {
        if !(MIN_DURATION_MS..=MAX_DURATION_MS).contains(&ms) || ms % DURATION_STEP_MS != 0 {
            return Err(TimerError::InvalidConfiguration { requested_ms: ms });
        }
        Ok(Self(ms))
    }

    pub fn as_ms(self) -> i64 {
        self.0
    }

    pub fn as_secs(self) -> i64 {
        self.0 / 1000
    }

    pub fn as_minutes(self) -> f64 {
        self.0 as f64 / 60_000.0
    }
}

impl Default for TimerDuration {
    fn default() -> Self {
        Self(DEFAULT_DURATION_MS)
    }
}

impl TryFrom<i64> for TimerDuration {
    type Error = TimerError;

    fn try_from(ms: i64) -> Result<Self, Self::Error> {
        Self::try_from_ms(ms)
    }
}

impl From<TimerDuration> for i64 {
    fn from(duration: TimerDuration) -> Self {
        duration.0
    }
}
