//! Drag physics state machine.
//!
//! ## State Transitions
//!
//! ```text
//! Resting -> Dragging -> Inertia -> (Snapping) -> Resting
//!                     \-> Snapping -> Resting        (slow release)
//! any -> Snapping                                    (reset)
//! ```
//!
//! Velocities are in px/frame at 60fps. `step_inertia` takes a frame ratio
//! (`elapsed_ms / FRAME_MS`) so friction decay does not depend on the
//! actual frame rate.

use serde::{Deserialize, Serialize};

use super::easing::{AnimPhase, SnapAnimation};
use crate::error::ConfigError;
use super::geometry::{Bounds, Layout, Vec2};
use super::velocity::VelocityTracker;

/// Duration of one reference frame (60fps).
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// Where a settled element comes to rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseTarget {
    /// Stay where inertia left it, pulled back inside the bounds if needed.
    #[default]
    NearestInBounds,
    /// Always return to the configured rest point.
    Rest,
}

/// Tuning for [`DragPhysics`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Velocity multiplier per reference frame.
    pub friction: f64,
    /// Below this speed (px/frame) motion counts as settled.
    pub velocity_threshold: f64,
    /// Spring pull per pixel of excursion past the bounds.
    pub spring_stiffness: f64,
    /// Velocity multiplier applied after each spring impulse.
    pub spring_damping: f64,
    /// Compress excursions past the bounds while dragging.
    pub elastic_bounds: bool,
    pub elastic_ratio: f64,
    /// Per-axis cap on release velocity (px/frame).
    pub max_velocity: f64,
    pub touch_multiplier: f64,
    pub sample_window_ms: i64,
    pub velocity_samples: usize,
    pub snap_duration_ms: i64,
    pub release_target: ReleaseTarget,
    pub rest: Vec2,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            friction: 0.94,
            velocity_threshold: 0.1,
            spring_stiffness: 0.15,
            spring_damping: 0.8,
            elastic_bounds: true,
            elastic_ratio: 0.5,
            max_velocity: 50.0,
            touch_multiplier: 1.0,
            sample_window_ms: 100,
            velocity_samples: 5,
            snap_duration_ms: 500,
            release_target: ReleaseTarget::NearestInBounds,
            rest: Vec2::ZERO,
        }
    }
}

impl DragConfig {
    /// Reject tuning under which inertia could never settle or the release
    /// clamp would be empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending
    /// `drag.*` key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(ok: bool, field: &str, rule: &str) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::InvalidValue {
                    key: format!("drag.{field}"),
                    message: format!("must be {rule}"),
                })
            }
        }

        // Written so that NaN fails every check.
        check(
            self.friction > 0.0 && self.friction < 1.0,
            "friction",
            "between 0 and 1 (exclusive)",
        )?;
        check(self.velocity_threshold > 0.0, "velocity_threshold", "greater than 0")?;
        check(self.spring_stiffness > 0.0, "spring_stiffness", "greater than 0")?;
        check(
            self.spring_damping > 0.0 && self.spring_damping <= 1.0,
            "spring_damping",
            "in (0, 1]",
        )?;
        check(
            (0.0..=1.0).contains(&self.elastic_ratio),
            "elastic_ratio",
            "in [0, 1]",
        )?;
        check(self.max_velocity >= 0.0, "max_velocity", "at least 0")?;
        check(self.touch_multiplier >= 0.0, "touch_multiplier", "at least 0")?;
        check(self.sample_window_ms > 0, "sample_window_ms", "greater than 0")?;
        check(self.snap_duration_ms >= 0, "snap_duration_ms", "at least 0")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragPhase {
    Resting,
    Dragging,
    Inertia,
    Snapping,
}

impl DragPhase {
    /// Whether the adapter needs to keep its frame callback registered.
    pub fn is_animating(self) -> bool {
        matches!(self, DragPhase::Inertia | DragPhase::Snapping)
    }
}

/// Per-frame render output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragFrame {
    pub position: Vec2,
    /// The element no longer overlaps its container (or, without a layout,
    /// lies outside the travel bounds).
    pub outside: bool,
    pub phase: DragPhase,
}

/// Spring velocity impulse pulling `position` back into `[min, max]`.
/// Zero inside the range; the sign always opposes the excursion.
pub fn spring_force(position: f64, min: f64, max: f64, stiffness: f64) -> f64 {
    if position < min {
        (min - position) * stiffness
    } else if position > max {
        (max - position) * stiffness
    } else {
        0.0
    }
}

/// Compress the part of `value` beyond `[min, max]` by `ratio`.
pub fn elastic_offset(value: f64, min: f64, max: f64, ratio: f64) -> f64 {
    if value > max {
        max + (value - max) * ratio
    } else if value < min {
        min + (value - min) * ratio
    } else {
        value
    }
}

/// Inverse of [`elastic_offset`]: the raw offset that compresses to `value`.
/// Identity when `ratio` is not positive.
pub fn elastic_source(value: f64, min: f64, max: f64, ratio: f64) -> f64 {
    if ratio <= 0.0 {
        value
    } else if value > max {
        max + (value - max) / ratio
    } else if value < min {
        min + (value - min) / ratio
    } else {
        value
    }
}

#[derive(Debug, Clone)]
pub struct DragPhysics {
    config: DragConfig,
    phase: DragPhase,
    position: Vec2,
    velocity: Vec2,
    bounds: Bounds,
    layout: Option<Layout>,
    tracker: VelocityTracker,
    /// Pointer position when the current gesture began.
    grab_pointer: Vec2,
    /// Uncompressed element offset when the current gesture began.
    grab_position: Vec2,
    snap: Option<SnapAnimation>,
    last_frame_ms: Option<i64>,
}

impl DragPhysics {
    pub fn new(config: DragConfig, bounds: Bounds) -> Self {
        let tracker = VelocityTracker::new(config.sample_window_ms, config.velocity_samples);
        let position = config.rest;
        Self {
            config,
            phase: DragPhase::Resting,
            position,
            velocity: Vec2::ZERO,
            bounds,
            layout: None,
            tracker,
            grab_pointer: Vec2::ZERO,
            grab_position: position,
            snap: None,
            last_frame_ms: None,
        }
    }

    pub fn with_layout(config: DragConfig, layout: Layout) -> Self {
        let mut physics = Self::new(config, layout.bounds());
        physics.layout = Some(layout);
        physics
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Number of pointer samples held for the active gesture.
    pub fn sample_count(&self) -> usize {
        self.tracker.len()
    }

    pub fn is_outside(&self) -> bool {
        match &self.layout {
            Some(layout) => layout.is_outside(self.position),
            None => !self.bounds.contains(self.position),
        }
    }

    pub fn current_frame(&self) -> DragFrame {
        DragFrame {
            position: self.position,
            outside: self.is_outside(),
            phase: self.phase,
        }
    }

    // ── Gesture ──────────────────────────────────────────────────────

    /// Grab the element. Cancels any inertia or snap in flight, keeping the
    /// element where it currently is.
    pub fn begin_drag(&mut self, pointer: Vec2, now_ms: i64) -> DragFrame {
        self.cancel_motion();
        self.tracker.clear();
        self.tracker.push(pointer, now_ms);
        self.velocity = Vec2::ZERO;
        self.grab_pointer = pointer;
        self.grab_position = if self.config.elastic_bounds {
            let b = self.bounds;
            let ratio = self.config.elastic_ratio;
            Vec2::new(
                elastic_source(self.position.x, b.min_x, b.max_x, ratio),
                elastic_source(self.position.y, b.min_y, b.max_y, ratio),
            )
        } else {
            self.position
        };
        self.last_frame_ms = None;
        self.set_phase(DragPhase::Dragging);
        self.current_frame()
    }

    pub fn update_drag(&mut self, pointer: Vec2, now_ms: i64) -> Option<DragFrame> {
        if self.phase != DragPhase::Dragging {
            return None;
        }
        self.tracker.push(pointer, now_ms);
        let raw = self.grab_position + (pointer - self.grab_pointer);
        self.position = if self.config.elastic_bounds {
            let b = self.bounds;
            let ratio = self.config.elastic_ratio;
            Vec2::new(
                elastic_offset(raw.x, b.min_x, b.max_x, ratio),
                elastic_offset(raw.y, b.min_y, b.max_y, ratio),
            )
        } else {
            raw
        };
        Some(self.current_frame())
    }

    /// Release the element. Fast releases coast with inertia; slow ones (and
    /// gestures with fewer than two samples) snap straight to rest.
    pub fn end_drag(&mut self, now_ms: i64) -> Option<DragFrame> {
        if self.phase != DragPhase::Dragging {
            return None;
        }
        let per_ms = self.tracker.estimate(now_ms);
        self.tracker.clear();
        let release = per_ms * (FRAME_MS * self.config.touch_multiplier);
        Some(self.fling(release, now_ms))
    }

    /// Start inertia from the current position with `velocity` (px/frame).
    pub fn fling(&mut self, velocity: Vec2, now_ms: i64) -> DragFrame {
        self.snap = None;
        self.tracker.clear();
        self.last_frame_ms = Some(now_ms);
        let velocity = velocity.clamp_axes(self.config.max_velocity);
        if velocity.length() < self.config.velocity_threshold {
            self.velocity = Vec2::ZERO;
            self.settle();
        } else {
            self.velocity = velocity;
            self.set_phase(DragPhase::Inertia);
        }
        self.current_frame()
    }

    // ── Animation ────────────────────────────────────────────────────

    /// Advance by one animation frame at `now_ms`.
    ///
    /// Returns the frame to render. A `Resting` frame means the adapter can
    /// deregister its frame callback.
    pub fn frame(&mut self, now_ms: i64) -> DragFrame {
        let delta_ms = match self.last_frame_ms {
            Some(last) => (now_ms - last).max(0) as f64,
            None => FRAME_MS,
        };
        self.last_frame_ms = Some(now_ms);
        match self.phase {
            DragPhase::Inertia => self.step_inertia(delta_ms / FRAME_MS),
            DragPhase::Snapping => self.step_snap(delta_ms),
            DragPhase::Resting | DragPhase::Dragging => self.current_frame(),
        }
    }

    /// One inertia step of `dt` reference frames.
    pub fn step_inertia(&mut self, dt: f64) -> DragFrame {
        if self.phase != DragPhase::Inertia || dt <= 0.0 {
            return self.current_frame();
        }
        let friction = self.config.friction.powf(dt);
        self.velocity = self.velocity * friction;
        self.position += self.velocity * dt;

        let b = self.bounds;
        let k = self.config.spring_stiffness;
        let damping = self.config.spring_damping;
        let fx = spring_force(self.position.x, b.min_x, b.max_x, k);
        if fx != 0.0 {
            self.velocity.x = (self.velocity.x + fx) * damping;
        }
        let fy = spring_force(self.position.y, b.min_y, b.max_y, k);
        if fy != 0.0 {
            self.velocity.y = (self.velocity.y + fy) * damping;
        }

        let threshold = self.config.velocity_threshold;
        if self.velocity.x.abs() < threshold && self.velocity.y.abs() < threshold {
            self.velocity = Vec2::ZERO;
            self.settle();
        }
        self.current_frame()
    }

    /// Advance the settle snap by `delta_ms`.
    pub fn step_snap(&mut self, delta_ms: f64) -> DragFrame {
        if self.phase != DragPhase::Snapping {
            return self.current_frame();
        }
        let Some(snap) = self.snap.as_mut() else {
            self.set_phase(DragPhase::Resting);
            return self.current_frame();
        };
        snap.advance(delta_ms);
        match snap.phase() {
            AnimPhase::Running { position } => self.position = position,
            AnimPhase::Completed => {
                self.position = snap.target();
                self.snap = None;
                self.velocity = Vec2::ZERO;
                self.last_frame_ms = None;
                self.set_phase(DragPhase::Resting);
            }
        }
        self.current_frame()
    }

    /// Snap back to the rest point from wherever the element is.
    pub fn reset(&mut self, now_ms: i64) -> DragFrame {
        self.tracker.clear();
        self.velocity = Vec2::ZERO;
        self.last_frame_ms = Some(now_ms);
        let rest = self.config.rest;
        self.snap_to(rest);
        self.current_frame()
    }

    /// Stop inertia or a snap in flight. Position and velocity keep their
    /// last computed values.
    pub fn cancel_motion(&mut self) {
        if self.phase.is_animating() {
            self.snap = None;
            self.last_frame_ms = None;
            self.set_phase(DragPhase::Resting);
        }
    }

    /// Replace the travel bounds. A resting element left outside the new
    /// bounds eases back in; elements in motion are corrected by the regular
    /// spring and settle logic.
    pub fn set_bounds(&mut self, bounds: Bounds, now_ms: i64) {
        self.bounds = bounds;
        if self.phase == DragPhase::Resting && !bounds.contains(self.position) {
            self.last_frame_ms = Some(now_ms);
            self.snap_to(bounds.clamp(self.position));
        }
    }

    /// Replace the container/element layout (container resize).
    pub fn set_layout(&mut self, layout: Layout, now_ms: i64) {
        self.layout = Some(layout);
        self.set_bounds(layout.bounds(), now_ms);
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn settle(&mut self) {
        let target = match self.config.release_target {
            ReleaseTarget::NearestInBounds => self.bounds.clamp(self.position),
            ReleaseTarget::Rest => self.config.rest,
        };
        self.snap_to(target);
    }

    fn snap_to(&mut self, target: Vec2) {
        if self.position.distance(target) < 1e-9 {
            self.position = target;
            self.snap = None;
            self.last_frame_ms = None;
            self.set_phase(DragPhase::Resting);
            return;
        }
        self.snap = Some(SnapAnimation::new(
            self.position,
            target,
            self.config.snap_duration_ms as f64,
        ));
        self.set_phase(DragPhase::Snapping);
    }

    fn set_phase(&mut self, phase: DragPhase) {
        if self.phase != phase {
            tracing::debug!(from = ?self.phase, to = ?phase, x = self.position.x, y = self.position.y, "drag phase");
            self.phase = phase;
        }
    }
}
