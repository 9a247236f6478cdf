//! Countdown and history duration formatting.
//!
//! The live countdown rounds remaining time *up* to whole seconds so it never
//! shows `00:00` before completion. Logged durations round *down* so the
//! history never overstates elapsed time. Both render as `MM:SS`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Guards `floor` against values like 1.9999999999999998 seconds that come
/// out of minute/second float conversions.
const FLOAT_SLACK_SECS: f64 = 1e-9;

/// `MM:SS` countdown face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownDisplay {
    pub minutes: i64,
    pub seconds: i64,
}

impl CountdownDisplay {
    /// Display for a remaining time, rounding up to whole seconds.
    pub fn from_remaining_ms(remaining_ms: i64) -> Self {
        Self::from_total_secs(ceil_secs(remaining_ms))
    }

    pub fn from_total_secs(total_secs: i64) -> Self {
        let total_secs = total_secs.max(0);
        Self {
            minutes: total_secs / 60,
            seconds: total_secs % 60,
        }
    }

    pub fn total_secs(&self) -> i64 {
        self.minutes * 60 + self.seconds
    }
}

impl fmt::Display for CountdownDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

/// Whole seconds, rounded up. Non-positive input yields 0.
pub fn ceil_secs(ms: i64) -> i64 {
    if ms <= 0 {
        0
    } else {
        (ms + 999) / 1000
    }
}

/// Format a logged duration in minutes as `MM:SS`, flooring both parts.
pub fn format_duration_minutes(minutes: f64) -> String {
    let minutes = if minutes.is_finite() { minutes.max(0.0) } else { 0.0 };
    let whole = minutes.floor();
    let secs = ((minutes - whole) * 60.0 + FLOAT_SLACK_SECS).floor().min(59.0);
    format!("{:02}:{:02}", whole as i64, secs as i64)
}
