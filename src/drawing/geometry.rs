//! Geometric primitives for selection and layout
//!
//! Integer pixel points and rectangles plus the grid-snapping helpers
//! used to align drag coordinates to character and line boundaries.

/// A point in viewport-relative pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in viewport-relative pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Half-open containment test: the right and bottom edges are outside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }
}

/// Snap `value` down to the nearest multiple of `grid_size`.
///
/// Floors toward negative infinity so that coordinates slightly above the
/// viewport still land on a full row boundary.
#[inline]
pub fn snap_to_min(value: i32, grid_size: i32) -> i32 {
    (value as f32 / grid_size as f32).floor() as i32 * grid_size
}

/// Snap `value` up to the nearest multiple of `grid_size`.
#[inline]
pub fn snap_to_max(value: i32, grid_size: i32) -> i32 {
    (value as f32 / grid_size as f32).ceil() as i32 * grid_size
}
