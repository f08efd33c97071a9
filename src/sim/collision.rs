//! Collision primitives shared by both games
//!
//! Square Shooter works with circles on a unit torus; Demon Kingdom with
//! integer pixel rectangles. Both are brute-force pairwise checks over a few
//! dozen objects per tick.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// True if two circles overlap (touching edges do not count)
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) < a_radius + b_radius
}

/// Wrap a position around the edges of the unit square
///
/// One correction per axis: anything moving less than a full map width per
/// tick ends up back inside `[0, 1]`.
#[inline]
pub fn wrap_unit(mut pos: Vec2) -> Vec2 {
    if pos.x < 0.0 {
        pos.x += 1.0;
    }
    if pos.y < 0.0 {
        pos.y += 1.0;
    }
    if pos.x > 1.0 {
        pos.x -= 1.0;
    }
    if pos.y > 1.0 {
        pos.y -= 1.0;
    }
    pos
}

/// True if the point is not strictly inside the unit square
#[inline]
pub fn is_outside_unit(pos: Vec2) -> bool {
    !(pos.x > 0.0 && pos.x < 1.0 && pos.y > 0.0 && pos.y < 1.0)
}

/// Axis-aligned pixel rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn left(&self) -> i32 {
        self.x
    }

    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    pub const fn top(&self) -> i32 {
        self.y
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn top_left(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn size(&self) -> IVec2 {
        IVec2::new(self.w, self.h)
    }

    /// Point-in-rect with half-open bounds (right and bottom edges excluded)
    pub fn contains(&self, point: IVec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Overlap test; rectangles that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    pub fn translate(&mut self, delta: IVec2) {
        self.x += delta.x;
        self.y += delta.y;
    }
}
