#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Two coordinate spaces meet here:
//!
//! - **Pixel space** ([`Point`], [`Rect`]): host pointer coordinates and
//!   rendered element rectangles, origin at the top-left of the page.
//! - **Grid space** ([`GridPosition`], [`GridSize`]): integer garden cells.
//!   One grid unit equals one area unit of a bed's declared dimensions.

use serde::{Deserialize, Serialize};

/// A point in host pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    #[inline]
    #[must_use]
    pub fn offset_from(self, other: Point) -> (f64, f64) {
        (self.x - other.x, self.y - other.y)
    }

    /// Euclidean distance to another point.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        let (dx, dy) = self.offset_from(other);
        dx.hypot(dy)
    }
}

/// A rectangle in host pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    #[must_use]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Top-left corner.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if the rectangle has no usable area.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Check if a point lies inside the rectangle (left/top inclusive).
    #[inline]
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Position of `point` relative to this rectangle as unclamped fractions
    /// of its width and height.
    ///
    /// Returns `None` for an empty rectangle.
    #[must_use]
    pub fn relative_fraction(&self, point: Point) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        let (dx, dy) = point.offset_from(self.origin());
        Some((dx / self.width, dy / self.height))
    }
}

/// Clamp a fractional coordinate into `[0, 1]`.
///
/// Non-finite input maps to `0.0`.
#[inline]
#[must_use]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Integer garden grid coordinate.
///
/// [`GridPosition::UNPLACED`] marks a bed that exists but has not been put on
/// the garden canvas yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    /// Sentinel for "not on the canvas".
    pub const UNPLACED: Self = Self { x: -1, y: -1 };

    /// Create a new grid position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// `false` only for the [`UNPLACED`](Self::UNPLACED) sentinel.
    #[inline]
    #[must_use]
    pub const fn is_placed(&self) -> bool {
        !(self.x == Self::UNPLACED.x && self.y == Self::UNPLACED.y)
    }
}

impl Default for GridPosition {
    fn default() -> Self {
        Self::UNPLACED
    }
}

/// Width and height in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    /// Create a new size.
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Area in grid units.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}
