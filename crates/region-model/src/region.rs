//! Normalized rectangle and point types.
//!
//! All coordinates are normalized to `[0.0, 1.0]` range.

use serde::{Deserialize, Serialize};

/// A rectangle within the analyzed frame.
///
/// Coordinates are normalized: `(0.0, 0.0)` is top-left,
/// `(1.0, 1.0)` is bottom-right of the full frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormRect {
    /// Left edge (normalized).
    pub x: f64,
    /// Top edge (normalized).
    pub y: f64,
    /// Width (normalized).
    pub w: f64,
    /// Height (normalized).
    pub h: f64,
}

impl NormRect {
    /// The whole frame.
    pub const FULL: NormRect = NormRect {
        x: 0.0,
        y: 0.0,
        w: 1.0,
        h: 1.0,
    };

    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// The center point of this rectangle.
    pub fn center(&self) -> Point2D {
        Point2D::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Area of the rectangle (0.0 to 1.0).
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// Check if a normalized point is within this rectangle.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// Move `self` toward `target` by fraction `t`, each component
    /// independently: `self + (target - self) * t`.
    pub fn approach(&self, target: &NormRect, t: f64) -> NormRect {
        NormRect {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
            w: self.w + (target.w - self.w) * t,
            h: self.h + (target.h - self.h) * t,
        }
    }

    /// Whether every edge lies inside the unit square.
    pub fn is_within_unit(&self) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= 1.0 + 1e-9 && self.bottom() <= 1.0 + 1e-9
    }
}

impl Default for NormRect {
    fn default() -> Self {
        Self::FULL
    }
}

/// A 2D normalized point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}
