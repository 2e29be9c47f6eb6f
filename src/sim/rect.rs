//! Axis-aligned rectangle geometry
//!
//! Everything in the world is a rect: the character, every obstacle and the
//! ground strip. The origin is the top-left corner and y grows downward,
//! matching canvas coordinates.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left origin, y-down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict AABB overlap test. Rects that merely touch along an edge do
    /// not overlap, and zero-sized rects overlap nothing.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.size.x > 0.0
            && self.size.y > 0.0
            && other.size.x > 0.0
            && other.size.y > 0.0
            && self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}
