use std::collections::VecDeque;

use super::geometry::Vec2;

/// Pointer position at an instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub position: Vec2,
    pub time_ms: i64,
}

/// Sliding window of recent pointer samples used to estimate release velocity.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    samples: VecDeque<PointerSample>,
    window_ms: i64,
    max_samples: usize,
}

impl VelocityTracker {
    /// `window_ms`: how far back samples are kept.
    /// `max_samples`: how many of the newest samples the estimate uses.
    pub fn new(window_ms: i64, max_samples: usize) -> Self {
        Self {
            samples: VecDeque::new(),
            window_ms,
            max_samples: max_samples.max(2),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn push(&mut self, position: Vec2, time_ms: i64) {
        self.samples.push_back(PointerSample { position, time_ms });
        self.evict(time_ms);
    }

    /// Velocity in px/ms from the newest samples still inside the window at
    /// `now_ms`. Fewer than two samples, or no elapsed time between them,
    /// yields zero.
    pub fn estimate(&mut self, now_ms: i64) -> Vec2 {
        self.evict(now_ms);
        let skip = self.samples.len().saturating_sub(self.max_samples);
        let mut recent = self.samples.iter().skip(skip);
        let (Some(first), Some(last)) = (recent.next(), self.samples.back()) else {
            return Vec2::ZERO;
        };
        let dt = (last.time_ms - first.time_ms) as f64;
        if self.samples.len() - skip < 2 || dt <= 0.0 {
            return Vec2::ZERO;
        }
        (last.position - first.position) * (1.0 / dt)
    }

    fn evict(&mut self, now_ms: i64) {
        while let Some(front) = self.samples.front() {
            if now_ms - front.time_ms > self.window_ms {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_sample_has_no_velocity() {
        let mut tracker = VelocityTracker::new(100, 5);
        tracker.push(Vec2::new(10.0, 10.0), 0);
        assert_eq!(tracker.estimate(0), Vec2::ZERO);
    }

    #[test]
    fn estimates_from_newest_samples() {
        let mut tracker = VelocityTracker::new(100, 5);
        // Slow early movement, then fast: only the last five count.
        for (i, x) in [0.0, 1.0, 2.0, 10.0, 20.0, 30.0, 40.0, 50.0].iter().enumerate() {
            tracker.push(Vec2::new(*x, 0.0), i as i64 * 10);
        }
        // Newest five: x = 10..50 over t = 30..70ms.
        let v = tracker.estimate(70);
        assert!((v.x - 1.0).abs() < 1e-12);
        assert_eq!(v.y, 0.0);
    }

    #[test]
    fn stale_samples_fall_out_of_window() {
        let mut tracker = VelocityTracker::new(100, 5);
        tracker.push(Vec2::ZERO, 0);
        tracker.push(Vec2::new(50.0, 0.0), 20);
        // Pointer held still for a while before release.
        assert_eq!(tracker.estimate(300), Vec2::ZERO);
        assert!(tracker.is_empty());
    }

    #[test]
    fn same_timestamp_samples_have_no_velocity() {
        let mut tracker = VelocityTracker::new(100, 5);
        tracker.push(Vec2::ZERO, 5);
        tracker.push(Vec2::new(30.0, 0.0), 5);
        assert_eq!(tracker.estimate(5), Vec2::ZERO);
    }
}
