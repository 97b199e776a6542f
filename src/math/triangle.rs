use super::{Point3, TOLERANCE};

/// Slack on barycentric coordinates so points on shared edges count as inside.
const BARYCENTRIC_TOLERANCE: f64 = 1e-9;

/// A triangle in 3D space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Point3,
    pub b: Point3,
    pub c: Point3,
}

impl Triangle {
    #[must_use]
    pub fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self { a, b, c }
    }

    /// Barycentric coordinates `(u, v)` of `point` relative to `a`, along
    /// `c - a` and `b - a` respectively. `None` for a degenerate triangle.
    #[must_use]
    pub fn barycentric(&self, point: &Point3) -> Option<(f64, f64)> {
        let v0 = self.c - self.a;
        let v1 = self.b - self.a;
        let v2 = point - self.a;

        let dot00 = v0.dot(&v0);
        let dot01 = v0.dot(&v1);
        let dot02 = v0.dot(&v2);
        let dot11 = v1.dot(&v1);
        let dot12 = v1.dot(&v2);

        let denom = dot00 * dot11 - dot01 * dot01;
        if denom.abs() < TOLERANCE * TOLERANCE {
            return None;
        }
        let u = (dot11 * dot02 - dot01 * dot12) / denom;
        let v = (dot00 * dot12 - dot01 * dot02) / denom;
        Some((u, v))
    }

    /// Inclusive containment test: edges and vertices count as inside.
    ///
    /// The point is assumed to be (close to) coplanar with the triangle.
    #[must_use]
    pub fn contains_point(&self, point: &Point3) -> bool {
        self.barycentric(point).is_some_and(|(u, v)| {
            u >= -BARYCENTRIC_TOLERANCE
                && v >= -BARYCENTRIC_TOLERANCE
                && u + v <= 1.0 + BARYCENTRIC_TOLERANCE
        })
    }
}
