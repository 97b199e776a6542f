use std::f64::consts::TAU;
use std::fmt;

use tracing::debug;

use crate::error::Result;
use crate::geometry::Plane;
use crate::math::triangle::Triangle;
use crate::math::{angle_between, centroid, Point3, Vector3, NORMAL_TOLERANCE};

use super::edge::EdgeId;
use super::mesh::Mesh;

/// Index of a polygon within its [`Topology`](super::Topology).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PolygonId(pub usize);

impl PolygonId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PolygonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A planar face of the polyhedron.
#[derive(Debug, Clone)]
pub struct Polygon {
    pub id: PolygonId,
    /// Plane through `center` with the face's outward normal.
    pub plane: Plane,
    /// Vertex indices in counter-clockwise order about the normal.
    pub vertices: Vec<usize>,
    /// The original triangulation, used for containment tests.
    pub triangles: Vec<Triangle>,
    pub center: Point3,
    /// Boundary edges, `edges[i]` running from `vertices[i]` to `vertices[i + 1]`.
    pub edges: Vec<EdgeId>,
}

impl Polygon {
    /// Returns the outward unit normal.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        self.plane.normal()
    }

    /// Returns the number of boundary edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.vertices.len()
    }

    /// Whether `point` lies on this polygon: within `EPSILON` of its plane
    /// and inside one of its triangles, boundary included.
    #[must_use]
    pub fn contains_point(&self, point: &Point3) -> bool {
        self.plane.contains_point(point) && self.triangles.iter().any(|t| t.contains_point(point))
    }
}

/// Groups the mesh triangles into planar polygons in discovery order and
/// orders each polygon's vertex ring.
pub(crate) fn organize_polygons(mesh: &Mesh) -> Result<Vec<Polygon>> {
    struct Group {
        normal: Vector3,
        triangles: Vec<[usize; 3]>,
    }

    let mut groups: Vec<Group> = Vec::new();
    for tri in &mesh.triangles {
        let normal = tri.normal.normalize();
        let existing = groups.iter_mut().find(|g| {
            angle_between(&g.normal, &normal).is_some_and(|a| a < NORMAL_TOLERANCE)
        });
        match existing {
            Some(group) => group.triangles.push(tri.indices),
            None => groups.push(Group {
                normal,
                triangles: vec![tri.indices],
            }),
        }
    }

    let polygons = groups
        .into_iter()
        .enumerate()
        .map(|(index, group)| {
            let mut unique: Vec<usize> = Vec::new();
            for &v in group.triangles.iter().flatten() {
                if !unique.contains(&v) {
                    unique.push(v);
                }
            }
            let points: Vec<Point3> = unique.iter().map(|&v| mesh.vertices[v]).collect();
            let center = centroid(&points).unwrap_or_else(Point3::origin);
            let vertices = order_ring(&unique, &points, &center, &group.normal);
            let plane = Plane::from_normal(center, group.normal)?;
            let triangles = group
                .triangles
                .iter()
                .map(|&[a, b, c]| {
                    Triangle::new(mesh.vertices[a], mesh.vertices[b], mesh.vertices[c])
                })
                .collect();

            Ok(Polygon {
                id: PolygonId(index),
                plane,
                vertices,
                triangles,
                center,
                edges: Vec::new(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(polygons = polygons.len(), triangles = mesh.triangles.len(), "organized polygons");
    Ok(polygons)
}

/// Sorts a vertex ring counter-clockwise about `normal`, starting from the
/// first vertex.
fn order_ring(
    indices: &[usize],
    points: &[Point3],
    center: &Point3,
    normal: &Vector3,
) -> Vec<usize> {
    let Some(first) = points.first() else {
        return Vec::new();
    };
    let reference = first - center;
    let position = |p: &Point3| {
        let offset = p - center;
        let angle = angle_between(&reference, &offset).unwrap_or(0.0);
        if reference.cross(&offset).dot(normal) < 0.0 {
            TAU - angle
        } else {
            angle
        }
    };

    let mut ring: Vec<(usize, f64)> = indices
        .iter()
        .zip(points)
        .map(|(&i, p)| (i, position(p)))
        .collect();
    ring.sort_by(|a, b| a.1.total_cmp(&b.1));
    ring.into_iter().map(|(i, _)| i).collect()
}
