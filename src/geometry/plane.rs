use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, EPSILON, TOLERANCE};

use super::curve::Segment;
use super::Ray;

/// An infinite plane through `origin` with a unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    origin: Point3,
    normal: Vector3,
}

impl Plane {
    /// Creates a plane from an origin and a normal vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal vector is zero-length.
    pub fn from_normal(origin: Point3, normal: Vector3) -> Result<Self> {
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            origin,
            normal: normal / len,
        })
    }

    /// Returns the unit normal of the plane.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Signed distance from the plane, positive on the normal side.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3) -> f64 {
        (point - self.origin).dot(&self.normal)
    }

    /// Whether `point` lies within [`EPSILON`] of the plane.
    #[must_use]
    pub fn contains_point(&self, point: &Point3) -> bool {
        self.signed_distance(point).abs() < EPSILON
    }

    /// Intersection parameter of `ray` with the plane, `t ≥ 0`.
    ///
    /// `None` when the ray is parallel to the plane or points away from it.
    #[must_use]
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f64> {
        let denom = ray.direction.dot(&self.normal);
        if denom.abs() < TOLERANCE {
            return None;
        }
        let t = (self.origin - ray.origin).dot(&self.normal) / denom;
        (t >= -TOLERANCE).then_some(t.max(0.0))
    }

    /// Point where the infinite line through `segment` meets the plane,
    /// together with its segment parameter. `None` when parallel.
    #[must_use]
    pub fn intersect_line(&self, segment: &Segment) -> Option<(Point3, f64)> {
        let delta = segment.delta();
        let denom = delta.dot(&self.normal);
        if denom.abs() < TOLERANCE {
            return None;
        }
        let t = (self.origin - segment.start).dot(&self.normal) / denom;
        Some((segment.at(t), t))
    }

    /// Like [`Plane::intersect_line`], restricted to the segment itself.
    #[must_use]
    pub fn intersect_segment(&self, segment: &Segment) -> Option<(Point3, f64)> {
        self.intersect_line(segment)
            .filter(|(_, t)| (-TOLERANCE..=1.0 + TOLERANCE).contains(t))
            .map(|(_, t)| {
                let t = t.clamp(0.0, 1.0);
                (segment.at(t), t)
            })
    }
}
