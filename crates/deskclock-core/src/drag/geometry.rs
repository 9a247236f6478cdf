use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

/// 2D point or vector in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    /// Clamp each axis to `[-|limit|, |limit|]`. A NaN limit leaves the
    /// vector unchanged.
    pub fn clamp_axes(self, limit: f64) -> Self {
        if limit.is_nan() {
            return self;
        }
        let limit = limit.abs();
        Self::new(self.x.clamp(-limit, limit), self.y.clamp(-limit, limit))
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Allowed travel rectangle for the dragged element's offset from rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Inverted ranges collapse to their midpoint.
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        let (min_x, max_x) = ordered(min_x, max_x);
        let (min_y, max_y) = ordered(min_y, max_y);
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Symmetric bounds around the rest point.
    pub fn symmetric(half_width: f64, half_height: f64) -> Self {
        Self::new(-half_width, half_width, -half_height, half_height)
    }

    pub fn unbounded() -> Self {
        Self {
            min_x: f64::NEG_INFINITY,
            max_x: f64::INFINITY,
            min_y: f64::NEG_INFINITY,
            max_y: f64::INFINITY,
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        (self.min_x..=self.max_x).contains(&p.x) && (self.min_y..=self.max_y).contains(&p.y)
    }

    /// Nearest point inside the bounds.
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.min_x, self.max_x),
            p.y.clamp(self.min_y, self.max_y),
        )
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::unbounded()
    }
}

fn ordered(min: f64, max: f64) -> (f64, f64) {
    if min <= max {
        (min, max)
    } else {
        let mid = (min + max) / 2.0;
        (mid, mid)
    }
}

/// Axis-aligned rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn translate(&self, offset: Vec2) -> Self {
        Self::new(self.left + offset.x, self.top + offset.y, self.width, self.height)
    }
}

/// Container and element rectangles measured at rest (zero offset).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub container: Rect,
    pub element: Rect,
}

impl Layout {
    pub fn new(container: Rect, element: Rect) -> Self {
        Self { container, element }
    }

    /// Offsets that keep the element fully inside the container.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(
            self.container.left - self.element.left,
            self.container.right() - self.element.right(),
            self.container.top - self.element.top,
            self.container.bottom() - self.element.bottom(),
        )
    }

    /// True when the element, moved by `offset`, no longer overlaps the
    /// container at all.
    pub fn is_outside(&self, offset: Vec2) -> bool {
        let element = self.element.translate(offset);
        element.right() < self.container.left
            || element.left > self.container.right()
            || element.bottom() < self.container.top
            || element.top > self.container.bottom()
    }
}
