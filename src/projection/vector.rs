use crate::geometry::Ray;
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::topology::Topology;

use super::ProjectedPoint;

/// Casts a ray onto the polyhedron surface.
///
/// Polygons are tested in index order and the first whose plane
/// intersection lies inside it wins, so a ray through a shared edge or
/// vertex lands on the lowest-indexed polygon.
#[derive(Debug, Clone, Copy)]
pub struct ProjectVector {
    direction: Vector3,
    origin: Point3,
}

impl ProjectVector {
    /// Creates a projection from the world origin along `direction`.
    #[must_use]
    pub fn new(direction: Vector3) -> Self {
        Self {
            direction,
            origin: Point3::origin(),
        }
    }

    /// Casts from `origin` instead of the world origin.
    #[must_use]
    pub fn with_origin(mut self, origin: Point3) -> Self {
        self.origin = origin;
        self
    }

    /// Returns the surface point hit by the ray, or `None` when the
    /// direction is zero or nothing is hit.
    #[must_use]
    pub fn execute(&self, topology: &Topology) -> Option<ProjectedPoint> {
        if self.direction.norm() < TOLERANCE {
            return None;
        }
        let ray = Ray::new(self.origin, self.direction);
        topology.polygons().iter().find_map(|polygon| {
            ray.intersect_plane(&polygon.plane)
                .filter(|point| polygon.contains_point(point))
                .map(|point| ProjectedPoint {
                    polygon: polygon.id,
                    point,
                })
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::projection::direction_from_angles;
    use crate::topology::{Mesh, Solid};

    fn topology(solid: Solid) -> Topology {
        Topology::new(&Mesh::regular(solid, 1.0)).unwrap()
    }

    #[test]
    fn face_center_direction_hits_face_center() {
        let topology = topology(Solid::Dodecahedron);
        for polygon in topology.polygons() {
            let hit = ProjectVector::new(polygon.center.coords).execute(&topology).unwrap();
            assert_eq!(hit.polygon, polygon.id);
            assert_abs_diff_eq!(hit.point, polygon.center, epsilon = 1e-6);
        }
    }

    #[test]
    fn projecting_a_surface_point_is_idempotent() {
        let topology = topology(Solid::Icosahedron);
        for (ra, dec) in [(0.3, 0.2), (2.0, -0.7), (4.5, 1.1)] {
            let first = topology.project_vector(&direction_from_angles(ra, dec)).unwrap();
            let again = topology.project_vector(&first.point.coords).unwrap();
            assert_eq!(again.polygon, first.polygon);
            assert_abs_diff_eq!(again.point, first.point, epsilon = 1e-9);
        }
    }

    #[test]
    fn every_direction_hits_exactly_one_interior() {
        let topology = topology(Solid::Dodecahedron);
        for i in 0..50 {
            let ra = f64::from(i) * 0.37;
            let dec = (f64::from(i) * 0.61).sin() * 1.3;
            let hit = topology.project_vector(&direction_from_angles(ra, dec)).unwrap();
            assert!(topology.polygon(hit.polygon).contains_point(&hit.point));
            assert_abs_diff_eq!(
                hit.point.coords.normalize(),
                direction_from_angles(ra, dec),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn zero_direction_misses() {
        let topology = topology(Solid::Cube);
        assert!(topology.project_vector(&Vector3::zeros()).is_none());
    }

    #[test]
    fn offset_origin_still_hits() {
        let topology = topology(Solid::Cube);
        let hit = ProjectVector::new(Vector3::x())
            .with_origin(Point3::new(0.0, 0.1, 0.1))
            .execute(&topology)
            .unwrap();
        assert_abs_diff_eq!(hit.point.x, 1.0 / 3.0_f64.sqrt(), epsilon = 1e-12);
    }
}
