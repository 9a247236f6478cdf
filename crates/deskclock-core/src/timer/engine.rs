//! Countdown timer implementation.
//!
//! The countdown is a wall-clock-based state machine. It does not use
//! internal threads or read the system clock - the caller passes `now_ms`
//! (epoch milliseconds) to every command and calls `tick()` periodically,
//! typically every 100ms for a smooth display.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused <-> Running) -> Completed
//! stop(): Running | Paused | Completed -> Idle
//! start(): Idle | Completed -> Running
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = CountdownTimer::new(TimerDuration::from_minutes(25.0));
//! timer.start(now_ms());
//! // In a loop:
//! timer.tick(now_ms()); // Some(Tick) when the second changes, Some(TimerCompleted) at zero
//! ```
//!
//! Commands called in the wrong phase are silent no-ops returning `None`.
//! The `try_*` variants report them as [`TimerError::InvalidTransition`].

use serde::{Deserialize, Serialize};

use super::display::{ceil_secs, CountdownDisplay};
use super::duration::TimerDuration;
use crate::error::TimerError;
use crate::events::{instant, SessionOutcome, TimerEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Countdown state machine.
///
/// `started_at_ms` is set exactly when the phase is not `Idle`. While running,
/// `end_at_ms == started_at_ms + duration + paused_total_ms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownTimer {
    duration: TimerDuration,
    phase: TimerPhase,
    #[serde(default)]
    started_at_ms: Option<i64>,
    #[serde(default)]
    end_at_ms: Option<i64>,
    /// Remaining time frozen at pause; only set while paused.
    #[serde(default)]
    paused_remaining_ms: Option<i64>,
    /// Instant of the current pause; only set while paused.
    #[serde(default)]
    paused_at_ms: Option<i64>,
    /// Total time spent paused since start.
    #[serde(default)]
    paused_total_ms: i64,
    /// Whole seconds last reported by `tick`, to suppress redundant renders.
    #[serde(skip)]
    last_displayed_secs: Option<i64>,
}

impl CountdownTimer {
    /// Create an idle countdown with the given duration.
    pub fn new(duration: TimerDuration) -> Self {
        Self {
            duration,
            phase: TimerPhase::Idle,
            started_at_ms: None,
            end_at_ms: None,
            paused_remaining_ms: None,
            paused_at_ms: None,
            paused_total_ms: 0,
            last_displayed_secs: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn duration(&self) -> TimerDuration {
        self.duration
    }

    pub fn started_at_ms(&self) -> Option<i64> {
        self.started_at_ms
    }

    pub fn end_at_ms(&self) -> Option<i64> {
        self.end_at_ms
    }

    pub fn paused_remaining_ms(&self) -> Option<i64> {
        self.paused_remaining_ms
    }

    pub fn paused_at_ms(&self) -> Option<i64> {
        self.paused_at_ms
    }

    pub fn paused_total_ms(&self) -> i64 {
        self.paused_total_ms
    }

    /// Remaining time as of `now_ms`, never negative.
    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        match self.phase {
            TimerPhase::Idle => self.duration.as_ms(),
            TimerPhase::Running => self
                .end_at_ms
                .map(|end| (end - now_ms).max(0))
                .unwrap_or(0),
            TimerPhase::Paused => self.paused_remaining_ms.unwrap_or(0),
            TimerPhase::Completed => 0,
        }
    }

    pub fn display(&self, now_ms: i64) -> CountdownDisplay {
        CountdownDisplay::from_remaining_ms(self.remaining_ms(now_ms))
    }

    /// Time actually counted down, excluding paused intervals.
    pub fn active_elapsed_ms(&self, now_ms: i64) -> i64 {
        match self.phase {
            TimerPhase::Idle => 0,
            TimerPhase::Completed => self.duration.as_ms(),
            _ => (self.duration.as_ms() - self.remaining_ms(now_ms)).max(0),
        }
    }

    /// 0.0 .. 1.0 progress through the countdown.
    pub fn progress(&self, now_ms: i64) -> f64 {
        self.active_elapsed_ms(now_ms) as f64 / self.duration.as_ms() as f64
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now_ms: i64) -> TimerEvent {
        TimerEvent::StateSnapshot {
            phase: self.phase,
            duration_ms: self.duration.as_ms(),
            remaining_ms: self.remaining_ms(now_ms),
            display: self.display(now_ms),
            at: instant(now_ms),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Set the countdown length in minutes. Rounded to 5s steps and clamped
    /// to [5s, 60min]. Only accepted while idle.
    pub fn configure(&mut self, minutes: f64) -> Option<TimerEvent> {
        self.try_configure(minutes).ok()
    }

    pub fn try_configure(&mut self, minutes: f64) -> Result<TimerEvent, TimerError> {
        if self.phase != TimerPhase::Idle {
            return Err(self.invalid("configure"));
        }
        let duration = TimerDuration::from_minutes(minutes);
        if (duration.as_minutes() - minutes).abs() > 1e-9 {
            tracing::warn!(
                requested_minutes = minutes,
                applied_ms = duration.as_ms(),
                "countdown duration adjusted to a 5s step within [5s, 60min]"
            );
        }
        self.duration = duration;
        Ok(TimerEvent::Configured {
            duration_ms: duration.as_ms(),
            display: CountdownDisplay::from_remaining_ms(duration.as_ms()),
        })
    }

    pub fn start(&mut self, now_ms: i64) -> Option<TimerEvent> {
        self.try_start(now_ms).ok()
    }

    pub fn try_start(&mut self, now_ms: i64) -> Result<TimerEvent, TimerError> {
        match self.phase {
            TimerPhase::Idle | TimerPhase::Completed => {
                let duration_ms = self.duration.as_ms();
                self.phase = TimerPhase::Running;
                self.started_at_ms = Some(now_ms);
                self.end_at_ms = Some(now_ms + duration_ms);
                self.paused_remaining_ms = None;
                self.paused_at_ms = None;
                self.paused_total_ms = 0;
                self.last_displayed_secs = None;
                tracing::debug!(duration_ms, now_ms, "countdown started");
                Ok(TimerEvent::TimerStarted {
                    duration_ms,
                    at: instant(now_ms),
                })
            }
            _ => Err(self.invalid("start")),
        }
    }

    /// Call periodically while running.
    ///
    /// Returns `TimerCompleted` once remaining time reaches zero, `Tick` when
    /// the displayed whole second changes, and `None` otherwise.
    pub fn tick(&mut self, now_ms: i64) -> Option<TimerEvent> {
        self.try_tick(now_ms).ok().flatten()
    }

    pub fn try_tick(&mut self, now_ms: i64) -> Result<Option<TimerEvent>, TimerError> {
        if self.phase != TimerPhase::Running {
            return Err(self.invalid("tick"));
        }
        let end = self.end_at_ms.unwrap_or(now_ms);
        let remaining_ms = end - now_ms;

        if remaining_ms <= 0 {
            // Remaining hit zero, so the whole configured duration was used.
            let elapsed_ms = (self.duration.as_ms() - remaining_ms).min(self.duration.as_ms());
            self.phase = TimerPhase::Completed;
            self.last_displayed_secs = Some(0);
            tracing::debug!(elapsed_ms, now_ms, "countdown completed");
            return Ok(Some(TimerEvent::TimerCompleted {
                outcome: SessionOutcome::completed(elapsed_ms),
                at: instant(now_ms),
            }));
        }

        let secs = ceil_secs(remaining_ms);
        if self.last_displayed_secs == Some(secs) {
            return Ok(None);
        }
        self.last_displayed_secs = Some(secs);
        Ok(Some(TimerEvent::Tick {
            remaining_ms,
            display: CountdownDisplay::from_total_secs(secs),
        }))
    }

    pub fn pause(&mut self, now_ms: i64) -> Option<TimerEvent> {
        self.try_pause(now_ms).ok()
    }

    pub fn try_pause(&mut self, now_ms: i64) -> Result<TimerEvent, TimerError> {
        if self.phase != TimerPhase::Running {
            return Err(self.invalid("pause"));
        }
        let remaining_ms = self.remaining_ms(now_ms);
        self.phase = TimerPhase::Paused;
        self.paused_remaining_ms = Some(remaining_ms);
        self.paused_at_ms = Some(now_ms);
        tracing::debug!(remaining_ms, now_ms, "countdown paused");
        Ok(TimerEvent::TimerPaused {
            remaining_ms,
            at: instant(now_ms),
        })
    }

    pub fn resume(&mut self, now_ms: i64) -> Option<TimerEvent> {
        self.try_resume(now_ms).ok()
    }

    pub fn try_resume(&mut self, now_ms: i64) -> Result<TimerEvent, TimerError> {
        if self.phase != TimerPhase::Paused {
            return Err(self.invalid("resume"));
        }
        let remaining_ms = self.paused_remaining_ms.take().unwrap_or(0);
        let end = now_ms + remaining_ms;
        self.paused_total_ms = match self.paused_at_ms.take() {
            Some(paused_at) => self.paused_total_ms + (now_ms - paused_at).max(0),
            // State stored without the pause instant.
            None => {
                let started = self.started_at_ms.unwrap_or(now_ms);
                (end - started - self.duration.as_ms()).max(0)
            }
        };
        self.end_at_ms = Some(end);
        self.phase = TimerPhase::Running;
        tracing::debug!(remaining_ms, now_ms, "countdown resumed");
        Ok(TimerEvent::TimerResumed {
            remaining_ms,
            at: instant(now_ms),
        })
    }

    /// Return to idle from any other phase.
    ///
    /// Stopping a running or paused countdown reports the active time used as
    /// a stopped-early outcome. Stopping a completed countdown reports none.
    pub fn stop(&mut self, now_ms: i64) -> Option<TimerEvent> {
        self.try_stop(now_ms).ok()
    }

    pub fn try_stop(&mut self, now_ms: i64) -> Result<TimerEvent, TimerError> {
        let outcome = match self.phase {
            TimerPhase::Idle => return Err(self.invalid("stop")),
            TimerPhase::Running | TimerPhase::Paused => Some(SessionOutcome::stopped_early(
                self.active_elapsed_ms(now_ms),
            )),
            TimerPhase::Completed => None,
        };
        tracing::debug!(from = ?self.phase, now_ms, "countdown stopped");
        *self = Self::new(self.duration);
        Ok(TimerEvent::TimerStopped {
            outcome,
            at: instant(now_ms),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn invalid(&self, operation: &'static str) -> TimerError {
        TimerError::InvalidTransition {
            operation,
            phase: self.phase,
        }
    }
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new(TimerDuration::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000_000;

    fn timer_secs(secs: i64) -> CountdownTimer {
        CountdownTimer::new(TimerDuration::from_secs(secs))
    }

    #[test]
    fn start_pause_resume() {
        let mut timer = CountdownTimer::default();
        assert_eq!(timer.phase(), TimerPhase::Idle);

        assert!(timer.start(T0).is_some());
        assert_eq!(timer.phase(), TimerPhase::Running);

        assert!(timer.pause(T0 + 1_000).is_some());
        assert_eq!(timer.phase(), TimerPhase::Paused);

        assert!(timer.resume(T0 + 5_000).is_some());
        assert_eq!(timer.phase(), TimerPhase::Running);
        assert_eq!(timer.paused_total_ms(), 4_000);
    }

    #[test]
    fn start_sets_end_from_duration() {
        let mut timer = timer_secs(60);
        timer.start(T0);
        assert_eq!(timer.started_at_ms(), Some(T0));
        assert_eq!(timer.end_at_ms(), Some(T0 + 60_000));
    }

    #[test]
    fn invalid_transitions_are_silent_no_ops() {
        let mut timer = CountdownTimer::default();
        assert!(timer.pause(T0).is_none());
        assert!(timer.resume(T0).is_none());
        assert!(timer.stop(T0).is_none());
        assert!(timer.tick(T0).is_none());
        assert_eq!(timer.phase(), TimerPhase::Idle);

        timer.start(T0);
        assert!(timer.start(T0 + 10).is_none());
        assert!(timer.configure(10.0).is_none());
        assert_eq!(timer.duration(), TimerDuration::default());
    }

    #[test]
    fn try_variants_report_invalid_transitions() {
        let mut timer = CountdownTimer::default();
        assert_eq!(
            timer.try_pause(T0),
            Err(TimerError::InvalidTransition {
                operation: "pause",
                phase: TimerPhase::Idle,
            })
        );
        timer.start(T0);
        assert!(matches!(
            timer.try_configure(5.0),
            Err(TimerError::InvalidTransition { operation: "configure", .. })
        ));
    }

    #[test]
    fn tick_emits_only_when_second_changes() {
        let mut timer = timer_secs(10);
        timer.start(T0);

        let first = timer.tick(T0 + 100);
        assert!(matches!(first, Some(TimerEvent::Tick { .. })));
        // Still 10 whole seconds (rounded up).
        assert!(timer.tick(T0 + 200).is_none());
        assert!(timer.tick(T0 + 900).is_none());

        match timer.tick(T0 + 1_000) {
            Some(TimerEvent::Tick { display, .. }) => assert_eq!(display.to_string(), "00:09"),
            other => panic!("expected tick, got {other:?}"),
        }
    }

    #[test]
    fn completes_at_end_instant() {
        let mut timer = timer_secs(5);
        timer.start(T0);
        match timer.tick(T0 + 4_999) {
            Some(TimerEvent::Tick { display, .. }) => assert_eq!(display.to_string(), "00:01"),
            other => panic!("expected tick, got {other:?}"),
        }
        match timer.tick(T0 + 5_000) {
            Some(TimerEvent::TimerCompleted { outcome, .. }) => {
                assert!(outcome.completed_naturally);
                assert_eq!(outcome.elapsed_ms, 5_000);
            }
            other => panic!("expected completion, got {other:?}"),
        }
        assert_eq!(timer.phase(), TimerPhase::Completed);
        assert_eq!(timer.display(T0 + 5_000).to_string(), "00:00");
        // Completed timers ignore further ticks.
        assert!(timer.tick(T0 + 6_000).is_none());
    }

    #[test]
    fn late_tick_records_configured_duration() {
        let mut timer = timer_secs(60);
        timer.start(T0);
        let event = timer.tick(T0 + 60_180).unwrap();
        assert_eq!(event.outcome().map(|o| o.elapsed_ms), Some(60_000));
    }

    #[test]
    fn paused_countdown_does_not_complete() {
        let mut timer = timer_secs(10);
        timer.start(T0);
        timer.pause(T0 + 3_000);
        assert_eq!(timer.remaining_ms(T0 + 60_000), 7_000);
        timer.resume(T0 + 60_000);
        assert_eq!(timer.end_at_ms(), Some(T0 + 67_000));
        assert!(matches!(timer.tick(T0 + 66_999), Some(TimerEvent::Tick { .. })));
        assert!(matches!(
            timer.tick(T0 + 67_000),
            Some(TimerEvent::TimerCompleted { .. })
        ));
    }

    #[test]
    fn stop_while_running_reports_active_time() {
        let mut timer = timer_secs(60);
        timer.start(T0);
        timer.pause(T0 + 10_000);
        timer.resume(T0 + 40_000);
        let event = timer.stop(T0 + 45_000).unwrap();
        let outcome = event.outcome().copied().unwrap();
        assert_eq!(outcome.elapsed_ms, 15_000);
        assert!(!outcome.completed_naturally);
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.started_at_ms(), None);
        assert_eq!(timer.end_at_ms(), None);
    }

    #[test]
    fn stop_while_paused_reports_time_before_pause() {
        let mut timer = timer_secs(60);
        timer.start(T0);
        timer.pause(T0 + 12_000);
        assert_eq!(timer.paused_remaining_ms(), Some(48_000));
        let event = timer.stop(T0 + 500_000).unwrap();
        let outcome = event.outcome().copied().unwrap();
        assert_eq!(outcome.elapsed_ms, 60_000 - 48_000);
        assert_eq!(outcome.elapsed_minutes, 0.2);
        assert!(!outcome.completed_naturally);
    }

    #[test]
    fn repeated_pauses_accumulate() {
        let mut timer = timer_secs(60);
        timer.start(T0);
        timer.pause(T0 + 1_000);
        assert_eq!(timer.paused_at_ms(), Some(T0 + 1_000));
        timer.resume(T0 + 3_000);
        assert_eq!(timer.paused_at_ms(), None);
        timer.pause(T0 + 10_000);
        timer.resume(T0 + 15_000);
        assert_eq!(timer.paused_total_ms(), 7_000);
        assert_eq!(timer.end_at_ms(), Some(T0 + 67_000));
    }

    #[test]
    fn stop_after_completion_reports_nothing() {
        let mut timer = timer_secs(5);
        timer.start(T0);
        timer.tick(T0 + 5_000);
        let event = timer.stop(T0 + 9_000).unwrap();
        assert!(event.outcome().is_none());
        assert_eq!(timer.phase(), TimerPhase::Idle);
    }

    #[test]
    fn restart_from_completed() {
        let mut timer = timer_secs(5);
        timer.start(T0);
        timer.tick(T0 + 5_000);
        assert!(timer.start(T0 + 8_000).is_some());
        assert_eq!(timer.end_at_ms(), Some(T0 + 13_000));
        assert!(matches!(timer.tick(T0 + 8_001), Some(TimerEvent::Tick { .. })));
    }

    #[test]
    fn configure_clamps_and_steps() {
        let mut timer = CountdownTimer::default();
        match timer.configure(0.01) {
            Some(TimerEvent::Configured { duration_ms, display }) => {
                assert_eq!(duration_ms, 5_000);
                assert_eq!(display.to_string(), "00:05");
            }
            other => panic!("expected configured, got {other:?}"),
        }
        timer.configure(120.0);
        assert_eq!(timer.duration().as_ms(), 3_600_000);
    }

    #[test]
    fn serde_roundtrip_keeps_running_state() {
        let mut timer = timer_secs(30);
        timer.start(T0);
        timer.pause(T0 + 1_000);
        let json = serde_json::to_string(&timer).unwrap();
        let restored: CountdownTimer = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.phase(), TimerPhase::Paused);
        assert_eq!(restored.paused_remaining_ms(), Some(29_000));
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let timer = CountdownTimer::default();
        match timer.snapshot(T0) {
            TimerEvent::StateSnapshot {
                phase,
                remaining_ms,
                display,
                ..
            } => {
                assert_eq!(phase, TimerPhase::Idle);
                assert_eq!(remaining_ms, 25 * 60 * 1000);
                assert_eq!(display.to_string(), "25:00");
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }
}
