//! Axis-aligned world rectangle

use crate::core::types::Vec2;

/// Axis-aligned rectangle in world units, defined by min and max corners.
///
/// Both edges are inclusive: a point lying exactly on `max` is contained.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Create rectangle from min and max corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create rectangle from origin and extent (`x`, `y`, `w`, `h`)
    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + w, y + h),
        }
    }

    /// Get size (max - min)
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Grow every edge outward by `padding`
    pub fn padded(&self, padding: f32) -> Rect {
        Rect {
            min: self.min - Vec2::splat(padding),
            max: self.max + Vec2::splat(padding),
        }
    }

    /// True if the rectangle is finite and non-inverted.
    ///
    /// A zero-area rectangle is valid (it still contains its own edge points).
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
            && self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    /// Check if point is inside the rectangle (inclusive on all edges)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.y && p.y <= self.max.y
    }
}
