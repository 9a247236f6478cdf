use super::geometry::Vec2;

/// Overshoot constant of the classic ease-out-back curve (about 10%).
pub const EASE_OVERSHOOT: f64 = 1.70158;

/// Ease-out with a single overshoot past 1.0 before settling.
///
/// `ease_out_back(0) == 0`, `ease_out_back(1) == 1`.
pub fn ease_out_back(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let c3 = EASE_OVERSHOOT + 1.0;
    let u = t - 1.0;
    1.0 + c3 * u.powi(3) + EASE_OVERSHOOT * u.powi(2)
}

/// Phase of a timed animation.
///
/// `Running` embeds the current eased position; zero-duration animations
/// complete immediately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimPhase {
    Running { position: Vec2 },
    Completed,
}

/// Eased snap from one offset to another over a fixed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapAnimation {
    from: Vec2,
    to: Vec2,
    elapsed_ms: f64,
    duration_ms: f64,
}

impl SnapAnimation {
    #[must_use]
    pub fn new(from: Vec2, to: Vec2, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            elapsed_ms: 0.0,
            duration_ms: duration_ms.max(0.0),
        }
    }

    pub fn target(&self) -> Vec2 {
        self.to
    }

    pub fn advance(&mut self, delta_ms: f64) {
        self.elapsed_ms += delta_ms.max(0.0);
    }

    #[must_use]
    pub fn phase(&self) -> AnimPhase {
        if self.elapsed_ms >= self.duration_ms {
            return AnimPhase::Completed;
        }
        let progress = (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0);
        AnimPhase::Running {
            position: self.position_at(progress),
        }
    }

    /// Position at `progress` in 0.0..=1.0.
    pub fn position_at(&self, progress: f64) -> Vec2 {
        self.from + (self.to - self.from) * ease_out_back(progress)
    }
}
