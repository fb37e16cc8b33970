use crate::geometry::{distance_to_segment_sq, Point};

/// Recursion cap for adaptive flattening.
pub const MAX_TESSELLATION_DEPTH: u32 = 16;

/// Cubic bezier curve used for arc rendering and distance queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point, // Start point
    pub p1: Point, // Control point 1
    pub p2: Point, // Control point 2
    pub p3: Point, // End point
}

impl CubicBezier {
    pub fn new(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Create a horizontal-biased "S-curve" between two points.
    ///
    /// Control points extend horizontally from start (to the right) and end
    /// (to the left) by `curvature * |dx|`, but never less than `min_offset`,
    /// so that wires running backwards still loop out of their pins.
    ///
    /// # Arguments
    /// * `start` - Start point (output side)
    /// * `end` - End point (input side)
    /// * `curvature` - Fraction of the horizontal distance used as offset (default: 0.5)
    /// * `min_offset` - Minimum control point offset (default: 50.0)
    pub fn s_curve(start: Point, end: Point, curvature: f64, min_offset: f64) -> Self {
        let d = end - start;

        // If distance is very small, use a straight line to avoid zig-zags
        if d.length_sq() < 10.0 * 10.0 {
            return CubicBezier::new(start, start, end, end);
        }

        let offset = (d.x.abs() * curvature).max(min_offset);
        CubicBezier::new(
            start,
            Point::new(start.x + offset, start.y),
            Point::new(end.x - offset, end.y),
            end,
        )
    }

    /// Evaluate the bezier curve at parameter t (0.0 to 1.0)
    pub fn eval(&self, t: f64) -> Point {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        self.p0 * mt3 + self.p1 * (3.0 * mt2 * t) + self.p2 * (3.0 * mt * t2) + self.p3 * t3
    }

    /// Split the curve at `t` with de Casteljau's algorithm.
    pub fn split_at(&self, t: f64) -> (CubicBezier, CubicBezier) {
        // Level 1: lerp between adjacent points
        let q0 = self.p0.lerp(self.p1, t);
        let q1 = self.p1.lerp(self.p2, t);
        let q2 = self.p2.lerp(self.p3, t);

        // Level 2
        let r0 = q0.lerp(q1, t);
        let r1 = q1.lerp(q2, t);

        // Level 3: the point on the curve at t
        let s = r0.lerp(r1, t);

        (
            CubicBezier::new(self.p0, q0, r0, s),
            CubicBezier::new(s, r1, q2, self.p3),
        )
    }

    /// Largest distance of the control points from the chord `p0..p3`.
    fn flatness(&self) -> f64 {
        distance_to_segment_sq(self.p1, self.p0, self.p3)
            .max(distance_to_segment_sq(self.p2, self.p0, self.p3))
            .sqrt()
    }

    /// Flatten the curve into a polyline.
    ///
    /// Subdivides at the midpoint until each piece's control points lie within
    /// `tolerance` of its chord, capped at [`MAX_TESSELLATION_DEPTH`]. The result
    /// always starts with `p0` and ends with `p3`.
    pub fn tessellate(&self, tolerance: f64) -> Vec<Point> {
        let tolerance = if tolerance > 0.0 { tolerance } else { 0.25 };
        let mut points = vec![self.p0];
        self.flatten_into(&mut points, tolerance, 0);
        points
    }

    fn flatten_into(&self, points: &mut Vec<Point>, tolerance: f64, depth: u32) {
        if depth >= MAX_TESSELLATION_DEPTH || self.flatness() <= tolerance {
            points.push(self.p3);
            return;
        }
        let (left, right) = self.split_at(0.5);
        left.flatten_into(points, tolerance, depth + 1);
        right.flatten_into(points, tolerance, depth + 1);
    }
}

/// Tessellate an arc route: a straight lead-out from `from` to `start`, the
/// S-curve between `start` and `end`, and a straight lead-in to `to`.
///
/// When the anchors sit on the pins (`from == start`, `end == to`) the lead
/// segments vanish and the result is just the tessellated S-curve.
pub fn tessellate_route(
    from: Point,
    start: Point,
    end: Point,
    to: Point,
    curvature: f64,
    min_offset: f64,
    tolerance: f64,
) -> Vec<Point> {
    let mut polyline = Vec::new();
    if from != start {
        polyline.push(from);
    }
    polyline.extend(CubicBezier::s_curve(start, end, curvature, min_offset).tessellate(tolerance));
    if to != end {
        polyline.push(to);
    }
    polyline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::distance_to_polyline;

    // ========================================================================
    // CubicBezier::s_curve() - Construction
    // ========================================================================

    #[test]
    fn test_s_curve_creates_horizontal_control_points() {
        let bezier = CubicBezier::s_curve(Point::new(0.0, 0.0), Point::new(200.0, 100.0), 0.5, 50.0);

        assert_eq!(bezier.p0, Point::new(0.0, 0.0));
        assert_eq!(bezier.p3, Point::new(200.0, 100.0));
        // Control points extend horizontally
        assert_eq!(bezier.p1, Point::new(100.0, 0.0));
        assert_eq!(bezier.p2, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_s_curve_min_offset_applies() {
        let bezier = CubicBezier::s_curve(Point::new(0.0, 0.0), Point::new(20.0, 100.0), 0.5, 50.0);
        assert_eq!(bezier.p1.x, 50.0);
        assert_eq!(bezier.p2.x, -30.0);
    }

    #[test]
    fn test_s_curve_backwards_wire_loops_out() {
        let bezier = CubicBezier::s_curve(Point::new(100.0, 0.0), Point::new(0.0, 0.0), 0.5, 50.0);
        // Start control point goes right, end control point goes left
        assert!(bezier.p1.x > bezier.p0.x);
        assert!(bezier.p2.x < bezier.p3.x);
    }

    #[test]
    fn test_s_curve_small_distance_is_straight() {
        let bezier = CubicBezier::s_curve(Point::new(0.0, 0.0), Point::new(5.0, 0.0), 0.5, 50.0);
        assert_eq!(bezier.p1, bezier.p0);
        assert_eq!(bezier.p2, bezier.p3);
    }

    // ========================================================================
    // eval() / split_at()
    // ========================================================================

    #[test]
    fn test_eval_endpoints() {
        let bezier = CubicBezier::s_curve(Point::new(0.0, 0.0), Point::new(100.0, 50.0), 0.5, 50.0);
        assert_eq!(bezier.eval(0.0), Point::new(0.0, 0.0));
        assert_eq!(bezier.eval(1.0), Point::new(100.0, 50.0));
    }

    #[test]
    fn test_eval_midpoint_is_symmetric() {
        let bezier = CubicBezier::s_curve(Point::new(0.0, 0.0), Point::new(100.0, 100.0), 0.5, 50.0);
        let mid = bezier.eval(0.5);
        assert!((mid.x - 50.0).abs() < 1e-9);
        assert!((mid.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_split_at_joins_on_curve() {
        let bezier = CubicBezier::s_curve(Point::new(0.0, 0.0), Point::new(300.0, 120.0), 0.5, 50.0);
        let (left, right) = bezier.split_at(0.3);
        let on_curve = bezier.eval(0.3);
        assert!(left.p3.distance_to(on_curve) < 1e-9);
        assert_eq!(left.p3, right.p0);
        assert!(left.eval(0.5).distance_to(bezier.eval(0.15)) < 1e-9);
    }

    // ========================================================================
    // tessellate()
    // ========================================================================

    #[test]
    fn test_tessellate_keeps_endpoints() {
        let bezier = CubicBezier::s_curve(Point::new(0.0, 0.0), Point::new(300.0, 200.0), 0.5, 50.0);
        let points = bezier.tessellate(0.25);
        assert_eq!(points.first(), Some(&bezier.p0));
        assert_eq!(points.last(), Some(&bezier.p3));
        assert!(points.len() > 4);
    }

    #[test]
    fn test_tessellate_within_tolerance_of_curve() {
        let bezier = CubicBezier::s_curve(Point::new(0.0, 0.0), Point::new(400.0, 150.0), 0.5, 50.0);
        let tolerance = 0.5;
        let points = bezier.tessellate(tolerance);
        for i in 0..=100 {
            let p = bezier.eval(i as f64 / 100.0);
            assert!(distance_to_polyline(p, &points) <= tolerance + 1e-9);
        }
    }

    #[test]
    fn test_tessellate_finer_tolerance_gives_more_points() {
        let bezier = CubicBezier::s_curve(Point::new(0.0, 0.0), Point::new(400.0, 150.0), 0.5, 50.0);
        assert!(bezier.tessellate(0.05).len() > bezier.tessellate(2.0).len());
    }

    #[test]
    fn test_tessellate_straight_line_is_two_points() {
        let bezier = CubicBezier::s_curve(Point::new(0.0, 0.0), Point::new(5.0, 0.0), 0.5, 50.0);
        assert_eq!(bezier.tessellate(0.25), vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)]);
    }

    #[test]
    fn test_tessellate_non_positive_tolerance_uses_default() {
        let bezier = CubicBezier::s_curve(Point::new(0.0, 0.0), Point::new(100.0, 100.0), 0.5, 50.0);
        assert_eq!(bezier.tessellate(0.0), bezier.tessellate(0.25));
    }

    // ========================================================================
    // tessellate_route()
    // ========================================================================

    #[test]
    fn test_route_without_anchor_offsets_is_plain_curve() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(200.0, 80.0);
        let route = tessellate_route(a, a, b, b, 0.5, 50.0, 0.25);
        let curve = CubicBezier::s_curve(a, b, 0.5, 50.0).tessellate(0.25);
        assert_eq!(route, curve);
    }

    #[test]
    fn test_route_with_offsets_adds_lead_segments() {
        let from = Point::new(0.0, 0.0);
        let start = Point::new(30.0, 60.0);
        let end = Point::new(170.0, 60.0);
        let to = Point::new(200.0, 0.0);
        let route = tessellate_route(from, start, end, to, 0.5, 50.0, 0.25);
        assert_eq!(route.first(), Some(&from));
        assert_eq!(route[1], start);
        assert_eq!(route[route.len() - 2], end);
        assert_eq!(route.last(), Some(&to));
    }
}
