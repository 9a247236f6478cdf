//! Paged horizontal swiper.
//!
//! Pages sit side by side with a fixed gap. Dragging moves the strip with the
//! pointer, rubber-banding past the first and last page; releasing beyond
//! `threshold` pixels moves one page in the swipe direction, otherwise the
//! strip snaps back.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwiperConfig {
    pub pages: usize,
    pub page_width: f64,
    pub gap: f64,
    /// Minimum horizontal travel, in pixels, that changes page.
    pub threshold: f64,
    /// Fraction of overscroll applied past either end.
    pub resistance: f64,
}

impl Default for SwiperConfig {
    fn default() -> Self {
        Self {
            pages: 3,
            page_width: 360.0,
            gap: 4.0,
            threshold: 50.0,
            resistance: 0.3,
        }
    }
}

/// A touch gesture counts as horizontal when `|dx| > |dy| * 0.5`; anything
/// else is left to vertical scrolling.
pub fn is_horizontal_swipe(dx: f64, dy: f64) -> bool {
    dx.abs() > dy.abs() * 0.5
}

#[derive(Debug, Clone)]
struct SwipeGesture {
    start_x: f64,
    start_y: f64,
    current_x: f64,
    start_offset: f64,
    /// Decided on the first move; `None` until then.
    horizontal: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct PageSwiper {
    config: SwiperConfig,
    page: usize,
    gesture: Option<SwipeGesture>,
}

impl PageSwiper {
    pub fn new(config: SwiperConfig) -> Self {
        let config = SwiperConfig {
            pages: config.pages.max(1),
            ..config
        };
        Self {
            config,
            page: 0,
            gesture: None,
        }
    }

    pub fn config(&self) -> &SwiperConfig {
        &self.config
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    /// Resting translation of `page`: `-page * (width + gap)`.
    pub fn page_offset(&self, page: usize) -> f64 {
        -(page as f64) * (self.config.page_width + self.config.gap)
    }

    /// Current translation of the page strip.
    pub fn offset(&self) -> f64 {
        match &self.gesture {
            Some(g) if g.horizontal != Some(false) => {
                self.resisted(g.start_offset + g.current_x - g.start_x)
            }
            _ => self.page_offset(self.page),
        }
    }

    pub fn begin(&mut self, x: f64, y: f64) {
        self.gesture = Some(SwipeGesture {
            start_x: x,
            start_y: y,
            current_x: x,
            start_offset: self.page_offset(self.page),
            horizontal: None,
        });
    }

    /// Track the pointer. Returns the new strip offset, or `None` when no
    /// gesture is active or it was classified as vertical scrolling.
    pub fn update(&mut self, x: f64, y: f64) -> Option<f64> {
        let gesture = self.gesture.as_mut()?;
        let (dx, dy) = (x - gesture.start_x, y - gesture.start_y);
        let horizontal = *gesture
            .horizontal
            .get_or_insert_with(|| is_horizontal_swipe(dx, dy));
        if !horizontal {
            return None;
        }
        gesture.current_x = x;
        Some(self.offset())
    }

    /// Release. Returns the page the strip settles on.
    pub fn end(&mut self) -> usize {
        let Some(gesture) = self.gesture.take() else {
            return self.page;
        };
        if gesture.horizontal == Some(false) {
            return self.page;
        }
        let dx = gesture.current_x - gesture.start_x;
        if dx.abs() > self.config.threshold {
            if dx > 0.0 && self.page > 0 {
                self.page -= 1;
            } else if dx < 0.0 && self.page + 1 < self.config.pages {
                self.page += 1;
            }
        }
        tracing::debug!(page = self.page, dx, "swipe settled");
        self.page
    }

    /// Jump to `page`. Out-of-range pages are ignored.
    pub fn go_to(&mut self, page: usize) -> bool {
        if page >= self.config.pages {
            return false;
        }
        self.page = page;
        self.gesture = None;
        true
    }

    fn resisted(&self, offset: f64) -> f64 {
        let max = 0.0;
        let min = self.page_offset(self.config.pages - 1);
        if offset > max {
            max + (offset - max) * self.config.resistance
        } else if offset < min {
            min + (offset - min) * self.config.resistance
        } else {
            offset
        }
    }
}

impl Default for PageSwiper {
    fn default() -> Self {
        Self::new(SwiperConfig::default())
    }
}
