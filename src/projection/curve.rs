use tracing::debug;

use crate::error::{ProjectionError, Result};
use crate::geometry::{CubicBezier, CurvePath, Ray, Segment};
use crate::math::transform::{align_to_z, rotation_z};
use crate::math::{Matrix4, Point3, Vector3, EPSILON};
use crate::topology::{EdgeId, Polygon, PolygonId, Topology};

use super::{patch_rotation, ProjectVector, ProjectedCurve, ProjectedPath};

/// Upper bound on how often a single input curve may be split at polygon
/// boundaries before projection gives up.
const MAX_SPLITS_PER_CURVE: usize = 64;

/// Parameter just past the start of a curve, sampled to tell which polygon
/// it heads into when it starts on a shared edge or vertex.
const LEAD_IN: f64 = 1e-3;

/// Projects world-space cubic curves onto the surface along a direction,
/// splitting them where they leave a polygon.
///
/// Each control point is moved along `direction` onto the current polygon's
/// plane. When the projected curve crosses one of the polygon's edges the
/// part up to the crossing is emitted and the rest is projected onto the
/// neighbouring polygon.
#[derive(Debug, Clone, Copy)]
pub struct ProjectCurves<'a> {
    curves: &'a [CubicBezier],
    direction: Vector3,
}

/// Earliest point at which a projected curve leaves its polygon.
#[derive(Debug, Clone, Copy)]
struct Exit {
    t: f64,
    edge: EdgeId,
}

impl<'a> ProjectCurves<'a> {
    #[must_use]
    pub fn new(curves: &'a [CubicBezier], direction: Vector3) -> Self {
        Self { curves, direction }
    }

    /// Returns the projected pieces in path order.
    ///
    /// # Errors
    ///
    /// - [`ProjectionError::NoIntersection`] if a control point cannot be
    ///   carried onto the surface.
    /// - [`ProjectionError::CurveDidNotConverge`] if a curve keeps splitting.
    pub fn execute(&self, topology: &Topology) -> Result<Vec<ProjectedCurve>> {
        let mut projected = Vec::with_capacity(self.curves.len());
        let mut preferred: Option<PolygonId> = None;
        let mut previous_end: Option<Point3> = None;

        for curve in self.curves {
            // A new run starts wherever its first point lands.
            if !previous_end.is_some_and(|end| (curve.start() - end).norm() < EPSILON) {
                preferred = None;
            }
            previous_end = Some(curve.end());

            let mut remaining = *curve;
            let mut splits = 0;
            loop {
                let (polygon, candidate) = self.project_onto(topology, &remaining, preferred)?;
                let Some(exit) = first_exit(topology, topology.polygon(polygon), &candidate) else {
                    projected.push(ProjectedCurve {
                        polygon,
                        curve: candidate,
                    });
                    preferred = Some(polygon);
                    break;
                };

                let neighbour = topology.shared_polygon(exit.edge);
                if 1.0 - exit.t < EPSILON {
                    // Effectively ends on the edge: keep it whole and start the
                    // next curve on the far side.
                    projected.push(ProjectedCurve {
                        polygon,
                        curve: candidate,
                    });
                    preferred = Some(neighbour);
                    break;
                }

                splits += 1;
                if splits > MAX_SPLITS_PER_CURVE {
                    return Err(ProjectionError::CurveDidNotConverge(splits).into());
                }
                projected.push(ProjectedCurve {
                    polygon,
                    curve: candidate.split_at(exit.t).0,
                });
                remaining = remaining.split_at(exit.t).1;
                preferred = Some(neighbour);
            }
        }

        Ok(projected)
    }

    /// Carries `curve` along the projection direction onto the first
    /// polygon, of `preferred` and the polygons hit through its start and
    /// just past its start, that holds the curve right after its start.
    ///
    /// A start on a shared edge or vertex lies on several polygons, and a
    /// hand-off through a vertex can name the wrong neighbour. When no
    /// candidate qualifies the first one is used.
    fn project_onto(
        &self,
        topology: &Topology,
        curve: &CubicBezier,
        preferred: Option<PolygonId>,
    ) -> Result<(PolygonId, CubicBezier)> {
        let cast = |origin: Point3| {
            ProjectVector::new(self.direction)
                .with_origin(origin)
                .execute(topology)
                .map(|hit| hit.polygon)
        };
        let candidates = preferred
            .into_iter()
            .chain(cast(curve.start()))
            .chain(cast(curve.point_at(LEAD_IN)));

        let mut fallback = None;
        for polygon in candidates {
            let projected = self.onto_plane(topology, curve, polygon)?;
            if topology.polygon(polygon).contains_point(&projected.point_at(LEAD_IN)) {
                return Ok((polygon, projected));
            }
            fallback.get_or_insert((polygon, projected));
        }
        fallback.ok_or_else(|| ProjectionError::NoIntersection.into())
    }

    fn onto_plane(
        &self,
        topology: &Topology,
        curve: &CubicBezier,
        polygon: PolygonId,
    ) -> Result<CubicBezier> {
        let plane = &topology.polygon(polygon).plane;
        let points = curve.control_points().iter().map(|p| {
            Ray::new(*p, self.direction)
                .intersect_plane(plane)
                .ok_or(ProjectionError::NoIntersection)
        });
        let mut out = [Point3::origin(); 4];
        for (slot, point) in out.iter_mut().zip(points) {
            *slot = point?;
        }
        Ok(CubicBezier::from_points(out))
    }
}

/// Finds where `curve` (lying in `polygon`'s plane) first leaves the polygon.
///
/// Polygon and curve are rotated flat so the planar bezier/line routine can
/// be used. Crossings at the very start are ignored since a remainder always
/// begins on the edge it entered through. A curve that ends on an edge
/// without crossing it exits there at `t = 1`.
fn first_exit(topology: &Topology, polygon: &Polygon, curve: &CubicBezier) -> Option<Exit> {
    let flat = align_to_z(polygon.normal());
    let flat_curve = curve.transformed(&flat);
    let end = flat_curve.end();

    let mut best: Option<Exit> = None;
    for edge in topology.polygon_edges(polygon.id) {
        let line = edge.segment.transformed(&flat);
        let t = flat_curve
            .intersect_segment(&line)
            .into_iter()
            .map(|hit| hit.t)
            .find(|&t| t > EPSILON)
            .or_else(|| ends_on_line(&end, &line).then_some(1.0));
        if let Some(t) = t {
            if best.map_or(true, |b| t < b.t) {
                best = Some(Exit { t, edge: edge.id });
            }
        }
    }
    best
}

/// Whether `point` sits on the interior of `line` (planar, z ignored).
fn ends_on_line(point: &Point3, line: &Segment) -> bool {
    let flat = |p: &Point3| Point3::new(p.x, p.y, 0.0);
    let line = Segment::new(flat(&line.start), flat(&line.end));
    let point = flat(point);
    let t = line.closest_point_parameter(&point);
    t > 0.0 && t < 1.0 && (line.at(t) - point).norm() < EPSILON
}

/// Projects a curve path drawn in a small local XY patch onto the surface
/// in the direction the patch's +Z axis is turned towards.
///
/// Pieces are grouped into one [`ProjectedPath`] per polygon, in order of
/// first appearance.
#[derive(Debug, Clone, Copy)]
pub struct ProjectCurvePath<'a> {
    path: &'a CurvePath,
    direction: Vector3,
    scale: f64,
    rotation: f64,
}

impl<'a> ProjectCurvePath<'a> {
    #[must_use]
    pub fn new(path: &'a CurvePath, direction: Vector3) -> Self {
        Self {
            path,
            direction,
            scale: 1.0,
            rotation: 0.0,
        }
    }

    /// Scales the patch in its own plane before projecting.
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Rotates the patch about its own +Z axis (radians) before projecting.
    #[must_use]
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Patch-to-world transform: scale, spin, then turn +Z onto the direction.
    #[must_use]
    pub fn patch_transform(&self) -> Matrix4 {
        let scale = Matrix4::new_nonuniform_scaling(&Vector3::new(self.scale, self.scale, 1.0));
        patch_rotation(&self.direction) * rotation_z(self.rotation) * scale
    }

    /// # Errors
    ///
    /// See [`ProjectCurves::execute`].
    pub fn execute(&self, topology: &Topology) -> Result<Vec<ProjectedPath>> {
        let transform = self.patch_transform();
        let curves: Vec<CubicBezier> = self
            .path
            .curves()
            .iter()
            .map(|c| c.transformed(&transform))
            .collect();

        let pieces = ProjectCurves::new(&curves, self.direction).execute(topology)?;

        let mut paths: Vec<ProjectedPath> = Vec::new();
        for piece in pieces {
            match paths.iter_mut().find(|p| p.polygon == piece.polygon) {
                Some(path) => path.path.push(piece.curve),
                None => paths.push(ProjectedPath {
                    polygon: piece.polygon,
                    path: CurvePath::from_curves(vec![piece.curve]),
                }),
            }
        }

        debug!(
            curves = self.path.len(),
            polygons = paths.len(),
            "projected curve path"
        );
        Ok(paths)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::shapes::{bezier_circle, bezier_star};
    use crate::math::transform::{transform_point, translation};
    use crate::topology::{Mesh, Solid};

    fn topology(solid: Solid) -> Topology {
        Topology::new(&Mesh::regular(solid, 1.0)).unwrap()
    }

    fn all_pieces(paths: &[ProjectedPath]) -> usize {
        paths.iter().map(|p| p.path.len()).sum()
    }

    fn pieces_on_their_polygons(topology: &Topology, paths: &[ProjectedPath]) -> bool {
        paths.iter().all(|path| {
            let polygon = topology.polygon(path.polygon);
            path.path
                .curves()
                .iter()
                .all(|curve| polygon.contains_point(&curve.point_at(0.5)))
        })
    }

    #[test]
    fn small_star_at_face_center_stays_on_face() {
        let topology = topology(Solid::Dodecahedron);
        let polygon = topology.polygon(PolygonId(5));
        let star = bezier_star(5, 0.01, None);
        let paths = topology.project_curve_path(&star, &polygon.center.coords).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].polygon, polygon.id);
        assert_eq!(paths[0].path.len(), 5);
        for point in paths[0].path.control_points() {
            assert!(polygon.plane.contains_point(&point));
        }
    }

    #[test]
    fn projection_follows_the_direction() {
        let topology = topology(Solid::Cube);
        let polygon = topology.polygon(PolygonId(2));
        let circle = bezier_circle(0.05);
        let paths = ProjectCurvePath::new(&circle, polygon.center.coords)
            .execute(&topology)
            .unwrap();
        // Parallel projection of a patch centred on the face normal keeps
        // the circle centred on the face.
        let points = paths[0].path.to_polyline(8);
        let sum = points.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords);
        #[allow(clippy::cast_precision_loss)]
        let mean = sum / points.len() as f64;
        assert_abs_diff_eq!(Point3::from(mean), polygon.center, epsilon = 1e-3);
    }

    #[test]
    fn circle_across_an_edge_is_split() {
        let topology = topology(Solid::Cube);
        let edge = topology.edge(topology.polygon(PolygonId(0)).edges[0]);
        let direction = edge.segment.center().coords;
        let circle = bezier_circle(0.1);

        let paths = topology.project_curve_path(&circle, &direction).unwrap();
        let neighbour = topology.shared_polygon(edge.id);
        let polygons: Vec<PolygonId> = paths.iter().map(|p| p.polygon).collect();
        assert_eq!(polygons.len(), 2);
        assert!(polygons.contains(&edge.polygon));
        assert!(polygons.contains(&neighbour));
        assert!(all_pieces(&paths) > circle.len());

        for path in &paths {
            let polygon = topology.polygon(path.polygon);
            for curve in path.path.curves() {
                assert!(polygon.contains_point(&curve.point_at(0.5)));
            }
        }
    }

    #[test]
    fn separate_runs_land_independently() {
        let topology = topology(Solid::Cube);
        let edge = topology.edge(topology.polygon(PolygonId(0)).edges[0]);
        let direction = edge.segment.center().coords;
        let mut runs = CurvePath::new();
        for offset in [0.3, -0.3] {
            let shift = translation(&Vector3::new(0.0, offset, 0.0));
            let moved = bezier_circle(0.03).transformed(&shift);
            for curve in moved.curves() {
                runs.push(*curve);
            }
        }
        assert_eq!(runs.split_continuous().len(), 2);

        let paths = topology.project_curve_path(&runs, &direction).unwrap();
        assert!(paths.len() >= 2);
        assert!(pieces_on_their_polygons(&topology, &paths));
    }

    #[test]
    fn stars_around_a_vertex_follow_their_faces() {
        let topology = topology(Solid::Icosahedron);
        let star = bezier_star(5, 0.08, None);
        for vertex in topology.vertices() {
            let paths = ProjectCurvePath::new(&star, vertex.coords).execute(&topology).unwrap();
            assert!(pieces_on_their_polygons(&topology, &paths), "{vertex:?}");
        }
    }

    #[test]
    fn split_pieces_stay_continuous() {
        let topology = topology(Solid::Icosahedron);
        let edge = topology.edge(topology.polygon(PolygonId(7)).edges[1]);
        let direction = edge.segment.center().coords;
        let world = bezier_star(5, 0.2, None).transformed(&patch_rotation(&direction));

        let pieces = ProjectCurves::new(world.curves(), direction).execute(&topology).unwrap();
        assert!(pieces.len() > 5);
        for pair in pieces.windows(2) {
            assert_abs_diff_eq!(pair[0].curve.end(), pair[1].curve.start(), epsilon = 1e-6);
        }
    }

    #[test]
    fn patch_transform_applies_scale_and_spin() {
        let path = CurvePath::new();
        let projection = ProjectCurvePath::new(&path, Vector3::z())
            .with_scale(2.0)
            .with_rotation(std::f64::consts::FRAC_PI_2);
        let moved = transform_point(&projection.patch_transform(), &Point3::new(1.0, 0.0, 0.0));
        assert_abs_diff_eq!(moved, Point3::new(0.0, 2.0, 0.0), epsilon = 1e-12);
    }
}
