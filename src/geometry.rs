//! Pure geometry helpers shared by hit-testing, layout and arc rendering.
//!
//! All coordinates are `f64`. World (graph-local) and screen coordinates use
//! the same types; [`ViewTransform`] converts between them.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// A 2D point or vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length_sq(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f64 {
        self.length_sq().sqrt()
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other - self).length()
    }

    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Linear interpolation between `self` and `other`
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }

    pub fn midpoint(self, other: Point) -> Point {
        self.lerp(other, 0.5)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Point;
    fn div(self, rhs: f64) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// Axis-aligned bounding box: top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Build a rect from two arbitrary corners (e.g. a drag origin and the
    /// current pointer), normalizing negative extents.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let min_x = a.x.min(b.x);
        let min_y = a.y.min(b.y);
        Self {
            x: min_x,
            y: min_y,
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn from_center(center: Point, width: f64, height: f64) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn max(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Open-interval overlap test: rects that merely touch do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    pub fn translated(&self, delta: Point) -> Rect {
        Rect::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Smallest rect containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max = self.max();
        let other_max = other.max();
        Rect::new(
            min_x,
            min_y,
            max.x.max(other_max.x) - min_x,
            max.y.max(other_max.y) - min_y,
        )
    }
}

/// Inclusive circle containment.
pub fn point_in_circle(p: Point, center: Point, radius: f64) -> bool {
    (p - center).length_sq() <= radius * radius
}

/// Squared distance from a point to a line segment
pub fn distance_to_segment_sq(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let ap = p - a;
    let ab_len_sq = ab.length_sq();

    if ab_len_sq < f64::EPSILON {
        // Degenerate segment (a == b)
        return ap.length_sq();
    }

    // Project point onto line, clamped to segment
    let t = (ap.dot(ab) / ab_len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length_sq()
}

pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    distance_to_segment_sq(p, a, b).sqrt()
}

/// Minimum distance from `p` to an open polyline.
///
/// Returns `f64::INFINITY` for an empty polyline; a single-point polyline is
/// treated as that point.
pub fn distance_to_polyline(p: Point, polyline: &[Point]) -> f64 {
    match polyline {
        [] => f64::INFINITY,
        [only] => p.distance_to(*only),
        _ => polyline
            .windows(2)
            .map(|w| distance_to_segment_sq(p, w[0], w[1]))
            .fold(f64::INFINITY, f64::min)
            .sqrt(),
    }
}

/// Pan/zoom mapping between graph-local (world) and screen coordinates:
/// `screen = canvas_origin + (world + pan) * zoom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub canvas_origin: Point,
    pub pan: Point,
    pub zoom: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            canvas_origin: Point::ZERO,
            pan: Point::ZERO,
            zoom: 1.0,
        }
    }
}

impl ViewTransform {
    pub fn new(canvas_origin: Point, pan: Point, zoom: f64) -> Self {
        Self { canvas_origin, pan, zoom }
    }

    fn safe_zoom(&self) -> f64 {
        if self.zoom > 0.0 {
            self.zoom
        } else {
            1.0
        }
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        self.canvas_origin + (world + self.pan) * self.safe_zoom()
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        (screen - self.canvas_origin) / self.safe_zoom() - self.pan
    }

    pub fn rect_to_screen(&self, rect: &Rect) -> Rect {
        let z = self.safe_zoom();
        let origin = self.world_to_screen(rect.origin());
        Rect::new(origin.x, origin.y, rect.width * z, rect.height * z)
    }

    pub fn rect_to_world(&self, rect: &Rect) -> Rect {
        let z = self.safe_zoom();
        let origin = self.screen_to_world(rect.origin());
        Rect::new(origin.x, origin.y, rect.width / z, rect.height / z)
    }
}
