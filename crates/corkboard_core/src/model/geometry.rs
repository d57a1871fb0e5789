//! Board-space geometry primitives.
//!
//! # Responsibility
//! - Define points, sizes and axis-aligned boxes in board-local units.
//! - Keep geometry free of any rendering surface or DOM-like handle.
//!
//! # Invariants
//! - Coordinates are relative to the board origin (top-left, y grows down).
//! - `BoardBounds` is passed explicitly on every tick; nothing caches it.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Point in board-local coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width/height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Area, treating negative or non-finite sides as empty.
    pub fn area(self) -> f64 {
        sanitize_extent(self.width) * sanitize_extent(self.height)
    }
}

/// Current bounding size of the board surface.
///
/// `Default` is the zero-sized board, which is what a missing rectangle
/// degrades to: every note is pinned to the origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardBounds {
    pub width: f64,
    pub height: f64,
}

impl BoardBounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Maps an optional host rectangle to bounds; `None` becomes zero-sized.
    pub fn or_missing(bounds: Option<Self>) -> Self {
        bounds.unwrap_or_default()
    }
}

/// Axis-aligned rectangle used by overlap math.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    pub fn right(&self) -> f64 {
        self.origin.x + sanitize_extent(self.size.width)
    }

    pub fn bottom(&self) -> f64 {
        self.origin.y + sanitize_extent(self.size.height)
    }

    /// Area of the intersection with `other`; zero when the boxes only touch.
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let dx = self.right().min(other.right()) - self.origin.x.max(other.origin.x);
        let dy = self.bottom().min(other.bottom()) - self.origin.y.max(other.origin.y);
        let area = dx.max(0.0) * dy.max(0.0);
        if area.is_finite() {
            area
        } else {
            0.0
        }
    }
}

fn sanitize_extent(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, Rect, Size};

    #[test]
    fn touching_boxes_do_not_intersect() {
        let a = Rect::new(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let b = Rect::new(Point::new(10.0, 0.0), Size::new(10.0, 10.0));
        assert_eq!(a.intersection_area(&b), 0.0);
    }

    #[test]
    fn partial_intersection_is_product_of_axis_overlaps() {
        let a = Rect::new(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let b = Rect::new(Point::new(4.0, 7.0), Size::new(10.0, 10.0));
        assert_eq!(a.intersection_area(&b), 18.0);
    }

    #[test]
    fn negative_size_has_no_area() {
        assert_eq!(Size::new(-5.0, 10.0).area(), 0.0);
        assert_eq!(Size::new(f64::NAN, 10.0).area(), 0.0);
    }
}
