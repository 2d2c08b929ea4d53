//! Geometry primitives shared by the transform layer and the layout table.
//!
//! Three coordinate spaces meet here:
//! - panel pixels (`PixelRect`, origin top-left, +Y down)
//! - texture UV (`UvRect`, normalized `[0,1]`, +V down to match raster rows)
//! - raster pixels (a `PixelRect` anchored at the raster origin)

use serde::{Deserialize, Serialize};

/// A 2D point, used for both pixel and UV coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    /// Creates a new rectangle from its top-left corner and size.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle anchored at the origin, e.g. a whole raster.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// True when the rectangle cannot be used as a transform basis.
    ///
    /// Layout thrash can briefly report zero or negative sizes, and NaN
    /// leaks in from some hosts; all of these are degenerate.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// Length of the shorter side.
    pub fn shorter_side(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Center point.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Axis-aligned rectangle in normalized UV space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UvRect {
    pub min_u: f64,
    pub min_v: f64,
    pub max_u: f64,
    pub max_v: f64,
}

impl UvRect {
    /// Creates a UV rectangle from its corners.
    pub const fn new(min_u: f64, min_v: f64, max_u: f64, max_v: f64) -> Self {
        Self {
            min_u,
            min_v,
            max_u,
            max_v,
        }
    }

    /// The full texture, `[0,1]x[0,1]`.
    pub const fn unit() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    pub fn width(&self) -> f64 {
        self.max_u - self.min_u
    }

    pub fn height(&self) -> f64 {
        self.max_v - self.min_v
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_u + self.max_u) / 2.0,
            (self.min_v + self.max_v) / 2.0,
        )
    }

    /// True when the rectangle is non-empty and lies within `[0,1]x[0,1]`.
    pub fn is_valid(&self) -> bool {
        let finite = [self.min_u, self.min_v, self.max_u, self.max_v]
            .iter()
            .all(|c| c.is_finite());
        finite
            && self.min_u >= 0.0
            && self.min_v >= 0.0
            && self.max_u <= 1.0
            && self.max_v <= 1.0
            && self.width() > 0.0
            && self.height() > 0.0
    }

    /// True when `self` and `other` share any interior area.
    pub fn overlaps(&self, other: &UvRect) -> bool {
        self.min_u < other.max_u
            && other.min_u < self.max_u
            && self.min_v < other.max_v
            && other.min_v < self.max_v
    }

    /// This rectangle expressed in the pixel space of a `width` x `height` raster.
    pub fn to_raster(&self, width: f64, height: f64) -> PixelRect {
        PixelRect::new(
            self.min_u * width,
            self.min_v * height,
            self.width() * width,
            self.height() * height,
        )
    }
}
