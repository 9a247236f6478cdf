use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timer::format_duration_minutes;

/// One finished countdown.
///
/// Serialized in camelCase with `startTime`/`duration` keys, the shape the
/// page keeps in local storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerRecord {
    #[serde(default)]
    pub id: String,
    pub start_time: DateTime<Utc>,
    /// Duration actually used, in minutes.
    #[serde(rename = "duration")]
    pub duration_minutes: f64,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TimerRecord {
    /// `MM:SS`, rounded down.
    pub fn formatted_duration(&self) -> String {
        format_duration_minutes(self.duration_minutes)
    }
}

/// `{epoch_ms}_{sequence}_{random}`.
///
/// The sequence is owned by the history and strictly increasing, so IDs
/// minted by one history never repeat even within the same millisecond.
pub(crate) fn record_id(at: DateTime<Utc>, sequence: u64) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}", at.timestamp_millis(), sequence, &random[..9])
}
