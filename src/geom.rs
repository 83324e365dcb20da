//! Geometry primitives: points, rectangles, and coordinate conversion.
//!
//! Everything here is a pure function over plain values. Zone geometry lives
//! in the fixed logical canvas space ([`CANVAS_WIDTH`] × [`CANVAS_HEIGHT`]);
//! the browser may render the canvas element at any CSS size, and
//! [`canvas_point`] corrects for that scaling. Degenerate (zero-size) inputs
//! never panic.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize, Serializer};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, MIN_ZONE_SIZE};

/// A point in either screen (CSS pixel) or canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This point translated by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/// An axis-aligned rectangle in canvas space.
///
/// Stored as `f64` so gestures stay smooth; committed zone geometry is
/// rounded to whole pixels and the wire format serializes integers (see the
/// field-level `serialize_with`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    #[serde(serialize_with = "int_px")]
    pub x: f64,
    #[serde(serialize_with = "int_px")]
    pub y: f64,
    #[serde(serialize_with = "int_px")]
    pub width: f64,
    #[serde(serialize_with = "int_px")]
    pub height: f64,
}

/// Serialize a pixel coordinate as a whole number.
#[allow(clippy::cast_possible_truncation)]
fn int_px<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i64(v.round() as i64)
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// The rectangle spanned by two opposite corners, in any drag direction.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    /// Right edge (`x + width`).
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive containment test. Degenerate rects contain only points on
    /// their own edges.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.right() && pt.y >= self.y && pt.y <= self.bottom()
    }

    /// All four coordinates rounded to whole pixels.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            x: self.x.round(),
            y: self.y.round(),
            width: self.width.round(),
            height: self.height.round(),
        }
    }

    /// This rect repositioned so it lies fully inside the canvas, size
    /// unchanged. A rect larger than the canvas is pinned to the origin.
    #[must_use]
    pub fn clamped_position(&self) -> Self {
        Self {
            x: clamp_origin(self.x, self.width, CANVAS_WIDTH),
            y: clamp_origin(self.y, self.height, CANVAS_HEIGHT),
            width: self.width,
            height: self.height,
        }
    }
}

/// Clamp a rect origin so `origin + size` stays within `[0, bound]`.
fn clamp_origin(origin: f64, size: f64, bound: f64) -> f64 {
    let max = (bound - size).max(0.0);
    origin.clamp(0.0, max)
}

/// Geometry of the rendered canvas element in CSS pixels, as reported by
/// `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Map a client (device/CSS pixel) point into logical canvas coordinates,
/// correcting for CSS scaling of the canvas element.
///
/// The scale is the ratio of the logical canvas size to the rendered size;
/// on a 1:1 canvas this is the identity (modulo the bounding-box offset).
/// A degenerate zero-size bounding box falls back to a 1:1 scale.
#[must_use]
pub fn canvas_point(client: Point, bounds: &CanvasBounds) -> Point {
    let scale_x = if bounds.width > 0.0 { CANVAS_WIDTH / bounds.width } else { 1.0 };
    let scale_y = if bounds.height > 0.0 { CANVAS_HEIGHT / bounds.height } else { 1.0 };
    Point {
        x: (client.x - bounds.left) * scale_x,
        y: (client.y - bounds.top) * scale_y,
    }
}

/// Normalize a zone rect for commit: rounded to whole pixels, at least
/// [`MIN_ZONE_SIZE`] on each edge, no larger than the canvas, and positioned
/// fully inside it.
#[must_use]
pub fn normalize_zone_rect(rect: Rect) -> Rect {
    let width = rect.width.round().clamp(MIN_ZONE_SIZE, CANVAS_WIDTH);
    let height = rect.height.round().clamp(MIN_ZONE_SIZE, CANVAS_HEIGHT);
    Rect {
        x: clamp_origin(rect.x.round(), width, CANVAS_WIDTH),
        y: clamp_origin(rect.y.round(), height, CANVAS_HEIGHT),
        width,
        height,
    }
}

/// Clamp a point into canvas bounds. Used while sizing an in-progress draw
/// rect so it can never extend past the canvas edge.
#[must_use]
pub fn clamp_to_canvas(pt: Point) -> Point {
    Point {
        x: pt.x.clamp(0.0, CANVAS_WIDTH),
        y: pt.y.clamp(0.0, CANVAS_HEIGHT),
    }
}
