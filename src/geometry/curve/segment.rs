use crate::math::transform::transform_point;
use crate::math::{Matrix4, Point3, Vector3, EPSILON, TOLERANCE};

/// A bounded line segment between two points.
///
/// The parametric form is `P(t) = start + t * (end - start)`, `t ∈ [0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point3,
    pub end: Point3,
}

impl Segment {
    /// Creates a segment from `start` to `end`.
    #[must_use]
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    /// Vector from `start` to `end`.
    #[must_use]
    pub fn delta(&self) -> Vector3 {
        self.end - self.start
    }

    /// Returns the length of the segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.delta().norm()
    }

    /// Point at parameter `t` (not clamped).
    #[must_use]
    pub fn at(&self, t: f64) -> Point3 {
        self.start + self.delta() * t
    }

    /// Returns the midpoint of the segment.
    #[must_use]
    pub fn center(&self) -> Point3 {
        self.at(0.5)
    }

    /// Parameter of the point on the infinite line closest to `point`.
    #[must_use]
    pub fn closest_point_parameter(&self, point: &Point3) -> f64 {
        let delta = self.delta();
        let len_sq = delta.norm_squared();
        if len_sq < TOLERANCE * TOLERANCE {
            return 0.0;
        }
        (point - self.start).dot(&delta) / len_sq
    }

    /// Whether `point` lies on the segment within [`EPSILON`].
    #[must_use]
    pub fn contains_point(&self, point: &Point3) -> bool {
        let t = self.closest_point_parameter(point);
        (-TOLERANCE..=1.0 + TOLERANCE).contains(&t) && (self.at(t) - point).norm() < EPSILON
    }

    /// Returns the segment with both endpoints transformed by `matrix`.
    #[must_use]
    pub fn transformed(&self, matrix: &Matrix4) -> Self {
        Self::new(
            transform_point(matrix, &self.start),
            transform_point(matrix, &self.end),
        )
    }
}
