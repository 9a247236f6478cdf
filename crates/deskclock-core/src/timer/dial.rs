//! Drag-to-set duration dial.
//!
//! Horizontal pointer movement maps to seconds (one pixel per second). The
//! dial supports both absolute pointer positions and relative pointer-lock
//! movement; a lost pointer lock can switch modes mid-gesture without losing
//! the accumulated value.

use super::duration::TimerDuration;

/// Seconds added per pixel of horizontal movement.
pub const SECONDS_PER_PIXEL: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct DurationDial {
    value: TimerDuration,
    adjusting: bool,
    drag_start_x: f64,
    drag_start_value: TimerDuration,
    /// Accumulated relative movement while pointer-locked.
    accumulated_px: f64,
}

impl DurationDial {
    pub fn new(value: TimerDuration) -> Self {
        Self {
            value,
            adjusting: false,
            drag_start_x: 0.0,
            drag_start_value: value,
            accumulated_px: 0.0,
        }
    }

    pub fn value(&self) -> TimerDuration {
        self.value
    }

    pub fn is_adjusting(&self) -> bool {
        self.adjusting
    }

    pub fn begin(&mut self, pointer_x: f64) {
        self.adjusting = true;
        self.drag_start_x = pointer_x;
        self.drag_start_value = self.value;
        self.accumulated_px = 0.0;
    }

    /// Absolute mode: the pointer is at `pointer_x`.
    pub fn drag_to(&mut self, pointer_x: f64) -> Option<TimerDuration> {
        if !self.adjusting {
            return None;
        }
        Some(self.apply(pointer_x - self.drag_start_x))
    }

    /// Pointer-lock mode: the pointer moved by `movement_x`.
    pub fn drag_by(&mut self, movement_x: f64) -> Option<TimerDuration> {
        if !self.adjusting {
            return None;
        }
        self.accumulated_px += movement_x;
        Some(self.apply(self.accumulated_px))
    }

    /// End the gesture and return the chosen duration.
    pub fn finish(&mut self) -> Option<TimerDuration> {
        if !self.adjusting {
            return None;
        }
        self.adjusting = false;
        self.accumulated_px = 0.0;
        Some(self.value)
    }

    fn apply(&mut self, delta_px: f64) -> TimerDuration {
        let delta_secs = (delta_px * SECONDS_PER_PIXEL).round() as i64;
        self.value = TimerDuration::from_secs(self.drag_start_value.as_secs() + delta_secs);
        self.value
    }
}

impl Default for DurationDial {
    fn default() -> Self {
        Self::new(TimerDuration::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_drag_maps_pixels_to_seconds() {
        let mut dial = DurationDial::new(TimerDuration::from_minutes(1.0));
        dial.begin(100.0);
        assert_eq!(dial.drag_to(130.0).map(|d| d.as_secs()), Some(90));
        // 62px -> 122s -> nearest 5s step is 120s
        assert_eq!(dial.drag_to(162.0).map(|d| d.as_secs()), Some(120));
        assert_eq!(dial.finish().map(|d| d.as_secs()), Some(120));
        assert!(!dial.is_adjusting());
    }

    #[test]
    fn pointer_lock_accumulates_movement() {
        let mut dial = DurationDial::new(TimerDuration::from_minutes(1.0));
        dial.begin(0.0);
        dial.drag_by(10.0);
        dial.drag_by(10.0);
        assert_eq!(dial.drag_by(-40.0).map(|d| d.as_secs()), Some(40));
    }

    #[test]
    fn dial_clamps_to_range() {
        let mut dial = DurationDial::new(TimerDuration::from_secs(30));
        dial.begin(0.0);
        assert_eq!(dial.drag_to(-500.0), Some(TimerDuration::MIN));
        assert_eq!(dial.drag_to(10_000.0), Some(TimerDuration::MAX));
    }

    #[test]
    fn moves_outside_gesture_are_ignored() {
        let mut dial = DurationDial::default();
        assert!(dial.drag_to(50.0).is_none());
        assert!(dial.drag_by(50.0).is_none());
        assert!(dial.finish().is_none());
        assert_eq!(dial.value(), TimerDuration::default());
    }
}
