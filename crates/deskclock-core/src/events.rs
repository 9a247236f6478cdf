use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{CountdownDisplay, TimerPhase};

/// Every countdown state change produces an Event.
/// The renderer draws them; the history sink records outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TimerEvent {
    /// Duration changed while idle.
    Configured {
        duration_ms: i64,
        display: CountdownDisplay,
    },
    TimerStarted {
        duration_ms: i64,
        at: DateTime<Utc>,
    },
    /// Display-worthy tick: the whole-second value changed.
    Tick {
        remaining_ms: i64,
        display: CountdownDisplay,
    },
    TimerPaused {
        remaining_ms: i64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_ms: i64,
        at: DateTime<Utc>,
    },
    TimerCompleted {
        outcome: SessionOutcome,
        at: DateTime<Utc>,
    },
    /// Returned to idle. `outcome` is `None` when stopping an already
    /// completed countdown, whose outcome was reported on completion.
    TimerStopped {
        outcome: Option<SessionOutcome>,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: TimerPhase,
        duration_ms: i64,
        remaining_ms: i64,
        display: CountdownDisplay,
        at: DateTime<Utc>,
    },
}

impl TimerEvent {
    /// The outcome to hand to the history sink, if this event ends a countdown.
    pub fn outcome(&self) -> Option<&SessionOutcome> {
        match self {
            TimerEvent::TimerCompleted { outcome, .. } => Some(outcome),
            TimerEvent::TimerStopped { outcome, .. } => outcome.as_ref(),
            _ => None,
        }
    }
}

/// How a countdown ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub elapsed_ms: i64,
    pub elapsed_minutes: f64,
    pub completed_naturally: bool,
}

impl SessionOutcome {
    pub fn completed(elapsed_ms: i64) -> Self {
        Self::new(elapsed_ms, true)
    }

    pub fn stopped_early(elapsed_ms: i64) -> Self {
        Self::new(elapsed_ms, false)
    }

    fn new(elapsed_ms: i64, completed_naturally: bool) -> Self {
        let elapsed_ms = elapsed_ms.max(0);
        Self {
            elapsed_ms,
            elapsed_minutes: elapsed_ms as f64 / 60_000.0,
            completed_naturally,
        }
    }
}

/// Convert epoch milliseconds into a UTC timestamp.
pub fn instant(epoch_ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(epoch_ms).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_minutes_follow_elapsed_ms() {
        let outcome = SessionOutcome::stopped_early(2_000);
        assert!((outcome.elapsed_minutes - 2.0 / 60.0).abs() < 1e-12);
        assert!(!outcome.completed_naturally);
    }

    #[test]
    fn outcome_only_on_ending_events() {
        let started = TimerEvent::TimerStarted {
            duration_ms: 5_000,
            at: instant(0),
        };
        assert!(started.outcome().is_none());

        let stopped = TimerEvent::TimerStopped {
            outcome: None,
            at: instant(0),
        };
        assert!(stopped.outcome().is_none());

        let completed = TimerEvent::TimerCompleted {
            outcome: SessionOutcome::completed(60_000),
            at: instant(60_000),
        };
        assert_eq!(completed.outcome().map(|o| o.elapsed_minutes), Some(1.0));
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let event = TimerEvent::TimerPaused {
            remaining_ms: 1_000,
            at: instant(0),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "TimerPaused");
        assert_eq!(json["remaining_ms"], 1_000);
    }
}
