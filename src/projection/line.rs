use tracing::debug;

use crate::error::{GeometryError, ProjectionError, Result};
use crate::geometry::{Plane, Segment};
use crate::math::{angle_between, Point3, EPSILON, TOLERANCE};
use crate::topology::{EdgeId, PolygonId, Topology};

use super::ProjectedSegment;

/// Projects the great-circle path between two surface points onto the
/// polyhedron, one segment per polygon crossed.
///
/// The path lies in the plane through the origin and both points; its
/// pieces follow each other from `a` to `b` and meet on the crossed edges.
#[derive(Debug, Clone, Copy)]
pub struct ProjectLineSegment {
    a: Point3,
    b: Point3,
}

/// A crossing of the cutting plane with a polyhedron edge.
#[derive(Debug, Clone, Copy)]
struct Crossing {
    edge: EdgeId,
    point: Point3,
    angle: f64,
}

impl ProjectLineSegment {
    /// Creates a projection of the straight path from `a` to `b`.
    #[must_use]
    pub fn new(a: Point3, b: Point3) -> Self {
        Self { a, b }
    }

    /// # Errors
    ///
    /// - [`ProjectionError::PointNotOnSurface`] if either end is not on a polygon.
    /// - [`GeometryError::Degenerate`] if the ends are collinear with the origin.
    /// - [`ProjectionError::NoPath`] if no boundary crossing joins the polygons.
    pub fn execute(&self, topology: &Topology) -> Result<Vec<ProjectedSegment>> {
        let from = topology
            .find_containing_polygon(&self.a)
            .ok_or(ProjectionError::PointNotOnSurface)?;
        let to = topology
            .find_containing_polygon(&self.b)
            .ok_or(ProjectionError::PointNotOnSurface)?;

        if from == to {
            return Ok(vec![ProjectedSegment {
                polygon: from,
                segment: Segment::new(self.a, self.b),
            }]);
        }

        let normal = self.a.coords.cross(&self.b.coords);
        if normal.norm() < TOLERANCE {
            return Err(GeometryError::Degenerate(
                "line end points are collinear with the origin".into(),
            )
            .into());
        }
        let coplane = Plane::from_normal(Point3::origin(), normal)?;

        if let Some(pieces) = self.across_common_edge(topology, &coplane, from, to) {
            return Ok(pieces);
        }

        let crossings = self.crossings(topology, &coplane);
        if crossings.is_empty() {
            return Err(ProjectionError::NoPath { from, to }.into());
        }

        let mut pieces = Vec::with_capacity(crossings.len() + 1);
        let mut polygon = from;
        let mut current = self.a;
        for (i, crossing) in crossings.iter().enumerate() {
            if (crossing.point - current).norm() >= EPSILON {
                pieces.push(ProjectedSegment {
                    polygon,
                    segment: Segment::new(current, crossing.point),
                });
            }
            let next_point = crossings.get(i + 1).map_or(self.b, |c| c.point);
            polygon = next_polygon(topology, polygon, crossing, &next_point)
                .ok_or(ProjectionError::NoPath { from, to })?;
            current = crossing.point;
        }
        if (self.b - current).norm() >= EPSILON || pieces.is_empty() {
            pieces.push(ProjectedSegment {
                polygon: to,
                segment: Segment::new(current, self.b),
            });
        }

        debug!(%from, %to, segments = pieces.len(), "projected line");
        Ok(pieces)
    }

    /// Two pieces meeting on the common edge of adjacent polygons, when the
    /// cutting plane crosses that edge.
    fn across_common_edge(
        &self,
        topology: &Topology,
        coplane: &Plane,
        from: PolygonId,
        to: PolygonId,
    ) -> Option<Vec<ProjectedSegment>> {
        let edge = topology.edge_between(from, to)?;
        let (point, _) = coplane.intersect_segment(&edge.segment)?;
        self.is_between(coplane, &point).then(|| {
            vec![
                ProjectedSegment {
                    polygon: from,
                    segment: Segment::new(self.a, point),
                },
                ProjectedSegment {
                    polygon: to,
                    segment: Segment::new(point, self.b),
                },
            ]
        })
    }

    /// Whether `point` lies on the short arc from `a` to `b` in angular order.
    fn is_between(&self, coplane: &Plane, point: &Point3) -> bool {
        let normal = coplane.normal();
        let p = point.coords.normalize();
        let a = self.a.coords.normalize();
        let b = self.b.coords.normalize();
        a.cross(&p).dot(normal) > -EPSILON && p.cross(&b).dot(normal) > -EPSILON
    }

    /// Edge crossings strictly ordered from `a` to `b`, one per surface point.
    fn crossings(&self, topology: &Topology, coplane: &Plane) -> Vec<Crossing> {
        let mut crossings: Vec<Crossing> = topology
            .unique_edges()
            .iter()
            .filter_map(|&id| {
                let (point, _) = coplane.intersect_segment(&topology.edge(id).segment)?;
                if !self.is_between(coplane, &point) {
                    return None;
                }
                let angle = angle_between(&self.a.coords, &point.coords)?;
                Some(Crossing {
                    edge: id,
                    point,
                    angle,
                })
            })
            .collect();

        crossings.sort_by(|x, y| x.angle.total_cmp(&y.angle));
        // A path through a vertex crosses every edge meeting there.
        crossings.dedup_by(|x, y| (x.point - y.point).norm() < EPSILON);
        crossings
    }
}

/// Polygon holding the path from `crossing` on to `next_point`.
///
/// Prefers the polygon across the crossed edge; when the path passes through
/// a vertex, falls back to the polygon containing the piece's midpoint.
fn next_polygon(
    topology: &Topology,
    current: PolygonId,
    crossing: &Crossing,
    next_point: &Point3,
) -> Option<PolygonId> {
    let edge = topology.edge(crossing.edge);
    let shared = topology.shared_polygon(crossing.edge);
    let candidate = if edge.polygon == current {
        Some(shared)
    } else if shared == current {
        Some(edge.polygon)
    } else {
        None
    };

    let midpoint = crossing.point + (next_point - crossing.point) * 0.5;
    match candidate {
        Some(polygon) if topology.polygon(polygon).contains_point(&midpoint) => Some(polygon),
        _ => topology.find_containing_polygon(&midpoint),
    }
}
