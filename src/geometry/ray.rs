use crate::math::{Point3, Vector3};

use super::Plane;

/// A half-line from `origin` along `direction` (not necessarily unit length).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vector3,
}

impl Ray {
    /// Creates a ray from `origin` along `direction`.
    #[must_use]
    pub fn new(origin: Point3, direction: Vector3) -> Self {
        Self { origin, direction }
    }

    /// Returns the point at parameter `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    /// Point where the ray meets `plane`, if it does.
    #[must_use]
    pub fn intersect_plane(&self, plane: &Plane) -> Option<Point3> {
        plane.intersect_ray(self).map(|t| self.at(t))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn ray_meets_tilted_plane() {
        let plane =
            Plane::from_normal(Point3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 1.0, 1.0)).unwrap();
        let ray = Ray::new(Point3::origin(), Vector3::new(0.0, 0.0, 2.0));
        let hit = ray.intersect_plane(&plane).unwrap();
        assert_abs_diff_eq!(hit, Point3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
    }
}
