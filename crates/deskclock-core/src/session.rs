//! Countdown session: the timer wired to its history sink.
//!
//! Every command forwards the resulting event's outcome (if any) to the
//! [`RecordSink`], so completed and stopped countdowns are logged exactly
//! once no matter which adapter drives the session.

use crate::events::{instant, TimerEvent};
use crate::history::RecordSink;
use crate::timer::{CountdownTimer, DurationDial, TimerDuration, TimerPhase};

#[derive(Debug, Clone)]
pub struct CountdownSession<S: RecordSink> {
    timer: CountdownTimer,
    dial: DurationDial,
    sink: S,
}

impl<S: RecordSink> CountdownSession<S> {
    pub fn new(timer: CountdownTimer, sink: S) -> Self {
        let dial = DurationDial::new(timer.duration());
        Self { timer, dial, sink }
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    pub fn dial(&self) -> &DurationDial {
        &self.dial
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_parts(self) -> (CountdownTimer, S) {
        (self.timer, self.sink)
    }

    // ── Timer commands ───────────────────────────────────────────────

    pub fn configure(&mut self, minutes: f64) -> Option<TimerEvent> {
        let event = self.timer.configure(minutes);
        if event.is_some() {
            self.dial = DurationDial::new(self.timer.duration());
        }
        event
    }

    pub fn start(&mut self, now_ms: i64) -> Option<TimerEvent> {
        self.timer.start(now_ms)
    }

    pub fn tick(&mut self, now_ms: i64) -> Option<TimerEvent> {
        let started_at_ms = self.timer.started_at_ms();
        let event = self.timer.tick(now_ms);
        self.dispatch(event, started_at_ms)
    }

    pub fn pause(&mut self, now_ms: i64) -> Option<TimerEvent> {
        self.timer.pause(now_ms)
    }

    pub fn resume(&mut self, now_ms: i64) -> Option<TimerEvent> {
        self.timer.resume(now_ms)
    }

    pub fn stop(&mut self, now_ms: i64) -> Option<TimerEvent> {
        let started_at_ms = self.timer.started_at_ms();
        let event = self.timer.stop(now_ms);
        self.dispatch(event, started_at_ms)
    }

    /// Clock click: start when idle or completed, otherwise stop.
    pub fn toggle(&mut self, now_ms: i64) -> Option<TimerEvent> {
        match self.timer.phase() {
            TimerPhase::Idle | TimerPhase::Completed => self.start(now_ms),
            TimerPhase::Running | TimerPhase::Paused => self.stop(now_ms),
        }
    }

    /// Pause button: pause when running, resume when paused.
    pub fn toggle_pause(&mut self, now_ms: i64) -> Option<TimerEvent> {
        match self.timer.phase() {
            TimerPhase::Running => self.pause(now_ms),
            TimerPhase::Paused => self.resume(now_ms),
            _ => None,
        }
    }

    // ── Duration dial ────────────────────────────────────────────────

    /// Grab the dial. An active countdown is stopped first (and logged).
    pub fn begin_adjust(&mut self, pointer_x: f64, now_ms: i64) -> Option<TimerEvent> {
        let stopped = match self.timer.phase() {
            TimerPhase::Idle => None,
            _ => self.stop(now_ms),
        };
        self.dial = DurationDial::new(self.timer.duration());
        self.dial.begin(pointer_x);
        stopped
    }

    pub fn adjust_to(&mut self, pointer_x: f64) -> Option<TimerDuration> {
        self.dial.drag_to(pointer_x)
    }

    pub fn adjust_by(&mut self, movement_x: f64) -> Option<TimerDuration> {
        self.dial.drag_by(movement_x)
    }

    /// Release the dial and apply its value to the timer.
    pub fn finish_adjust(&mut self) -> Option<TimerEvent> {
        let value = self.dial.finish()?;
        self.timer.configure(value.as_minutes())
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Records carry the countdown's start time, captured before the
    /// command ran since `stop` resets the timer.
    fn dispatch(
        &mut self,
        event: Option<TimerEvent>,
        started_at_ms: Option<i64>,
    ) -> Option<TimerEvent> {
        // An outcome only follows Running or Paused, where the start is set.
        if let (Some(outcome), Some(started)) =
            (event.as_ref().and_then(TimerEvent::outcome), started_at_ms)
        {
            let at = instant(started);
            self.sink
                .add_record(outcome.elapsed_minutes, outcome.completed_naturally, at);
        }
        event
    }
}
