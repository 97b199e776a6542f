use crate::math::cubic::{bezier_line_intersections, BezierLineHit};
use crate::math::transform::transform_point;
use crate::math::{Matrix4, Point3, Vector3};

use super::Segment;

/// A cubic bezier curve defined by four control points.
///
/// `points[0]` and `points[3]` are the end points, `points[1]` and
/// `points[2]` the inner control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    points: [Point3; 4],
}

impl CubicBezier {
    #[must_use]
    pub fn new(p0: Point3, p1: Point3, p2: Point3, p3: Point3) -> Self {
        Self {
            points: [p0, p1, p2, p3],
        }
    }

    #[must_use]
    pub fn from_points(points: [Point3; 4]) -> Self {
        Self { points }
    }

    /// A straight line from `start` to `end` expressed as a cubic, with the
    /// inner control points at a quarter and three quarters of the way.
    #[must_use]
    pub fn line(start: Point3, end: Point3) -> Self {
        let seg = Segment::new(start, end);
        Self::new(start, seg.at(0.25), seg.at(0.75), end)
    }

    /// Returns the four control points.
    #[must_use]
    pub fn control_points(&self) -> &[Point3; 4] {
        &self.points
    }

    /// Returns the start point of the curve.
    #[must_use]
    pub fn start(&self) -> Point3 {
        self.points[0]
    }

    /// Returns the end point of the curve.
    #[must_use]
    pub fn end(&self) -> Point3 {
        self.points[3]
    }

    /// Point at parameter `t` (Bernstein form, not clamped).
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        let [p0, p1, p2, p3] = self.points;
        let mt = 1.0 - t;
        let coords = p0.coords * (mt * mt * mt)
            + p1.coords * (3.0 * mt * mt * t)
            + p2.coords * (3.0 * mt * t * t)
            + p3.coords * (t * t * t);
        Point3::from(coords)
    }

    /// First derivative at parameter `t`.
    #[must_use]
    pub fn derivative_at(&self, t: f64) -> Vector3 {
        let [p0, p1, p2, p3] = self.points;
        let mt = 1.0 - t;
        (p1 - p0) * (3.0 * mt * mt) + (p2 - p1) * (6.0 * mt * t) + (p3 - p2) * (3.0 * t * t)
    }

    /// Splits the curve at `t` (de Casteljau). Both halves trace the
    /// original curve exactly; splitting at `0` or `1` yields one
    /// zero-length half.
    #[must_use]
    pub fn split_at(&self, t: f64) -> (Self, Self) {
        let [a, b, c, d] = self.points;
        let e = a.lerp(&b, t);
        let f = b.lerp(&c, t);
        let g = c.lerp(&d, t);
        let h = e.lerp(&f, t);
        let j = f.lerp(&g, t);
        let k = h.lerp(&j, t);
        (Self::new(a, e, h, k), Self::new(k, j, g, d))
    }

    /// Returns the curve with every control point transformed by `matrix`.
    #[must_use]
    pub fn transformed(&self, matrix: &Matrix4) -> Self {
        self.map_points(|p| transform_point(matrix, p))
    }

    /// Returns the curve with `f` applied to every control point.
    #[must_use]
    pub fn map_points(&self, f: impl Fn(&Point3) -> Point3) -> Self {
        Self {
            points: [
                f(&self.points[0]),
                f(&self.points[1]),
                f(&self.points[2]),
                f(&self.points[3]),
            ],
        }
    }

    /// Crossings with a segment in the XY plane (z ignored), sorted by `t`.
    #[must_use]
    pub fn intersect_segment(&self, segment: &Segment) -> Vec<BezierLineHit> {
        bezier_line_intersections(&self.points, &segment.start, &segment.end)
    }
}
