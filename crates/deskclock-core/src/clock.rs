//! Wall clock face formatting.

use std::fmt;
use std::str::FromStr;

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Hour format of the clock face, cycled by the format button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockFormat {
    #[default]
    H24,
    H12,
}

impl ClockFormat {
    pub fn next(self) -> Self {
        match self {
            ClockFormat::H24 => ClockFormat::H12,
            ClockFormat::H12 => ClockFormat::H24,
        }
    }

    /// Button label.
    pub fn label(self) -> &'static str {
        match self {
            ClockFormat::H24 => "24H",
            ClockFormat::H12 => "12H",
        }
    }
}

impl fmt::Display for ClockFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ClockFormat {
    type Err = ConfigError;

    /// Accepts `24h`/`h24`/`0` and `12h`/`h12`/`1`, case-insensitive. The
    /// digits are how the page stores the preference.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "24h" | "h24" | "24" | "0" => Ok(ClockFormat::H24),
            "12h" | "h12" | "12" | "1" => Ok(ClockFormat::H12),
            other => Err(ConfigError::InvalidValue {
                key: "clock.format".to_string(),
                message: format!("unknown clock format '{other}'"),
            }),
        }
    }
}

/// `HH:MM:SS`. The 12-hour face has no AM/PM marker and shows midnight and
/// noon as `12`.
pub fn format_clock<T: Timelike>(time: &T, format: ClockFormat) -> String {
    let hours = match format {
        ClockFormat::H24 => time.hour(),
        ClockFormat::H12 => match time.hour() % 12 {
            0 => 12,
            h => h,
        },
    };
    format!("{:02}:{:02}:{:02}", hours, time.minute(), time.second())
}
