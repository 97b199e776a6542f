//! Polyhedron topology: planar polygons, their linked boundary edges and the
//! global properties derived from them.
//!
//! Polygons and edges live in flat vectors addressed by [`PolygonId`] and
//! [`EdgeId`]; every cross reference (`next`, `prev`, `shared`, a polygon's
//! edge list) is an index into those vectors.

pub mod edge;
pub mod mesh;
pub mod polygon;
pub mod solids;

pub use edge::{Edge, EdgeId, EdgeKey};
pub use mesh::{Mesh, MeshTriangle};
pub use polygon::{Polygon, PolygonId};
pub use solids::Solid;

use std::f64::consts::PI;

use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::geometry::CurvePath;
use crate::math::{angle_between, Point3, Vector3};
use crate::projection::{
    ProjectCurvePath, ProjectLineSegment, ProjectVector, ProjectedPath, ProjectedPoint,
    ProjectedSegment,
};

/// The immutable face/edge graph of a closed convex polyhedron.
#[derive(Debug, Clone)]
pub struct Topology {
    vertices: Vec<Point3>,
    polygons: Vec<Polygon>,
    edges: Vec<Edge>,
    unique_edges: Vec<EdgeId>,
    dihedral: f64,
    face_radius: f64,
}

impl Topology {
    /// Builds the topology of a closed convex mesh.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidMesh`] for an empty or malformed mesh
    /// and [`TopologyError::NonManifoldTopology`] when an edge is not shared
    /// by exactly two polygons.
    pub fn new(mesh: &Mesh) -> Result<Self> {
        mesh.validate()?;
        let mut polygons = polygon::organize_polygons(mesh)?;
        let (edges, unique_edges) = edge::link_edges(&mut polygons, &mesh.vertices)?;

        let first = polygons
            .first()
            .ok_or_else(|| TopologyError::InvalidMesh("mesh has no polygons".into()))?;
        let neighbour = first
            .edges
            .first()
            .map(|&id| &polygons[edges[edges[id.0].shared.0].polygon.0])
            .ok_or_else(|| TopologyError::InvalidMesh("polygon 0 has no edges".into()))?;
        let normal_angle = angle_between(first.normal(), neighbour.normal()).unwrap_or(0.0);
        let dihedral = PI - normal_angle;
        let face_radius = first.center.coords.norm();

        debug!(
            polygons = polygons.len(),
            edges = unique_edges.len(),
            vertices = mesh.vertices.len(),
            dihedral = dihedral.to_degrees(),
            face_radius,
            "built topology"
        );

        Ok(Self {
            vertices: mesh.vertices.clone(),
            polygons,
            edges,
            unique_edges,
            dihedral,
            face_radius,
        })
    }

    /// Returns the vertex positions shared by all polygons.
    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Returns the polygons in index order.
    #[must_use]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Returns the number of polygons.
    #[must_use]
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// The polygon with the given id. Ids handed out by this topology are
    /// always valid.
    #[must_use]
    pub fn polygon(&self, id: PolygonId) -> &Polygon {
        &self.polygons[id.0]
    }

    /// All directed edges; every physical edge appears twice.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the directed edge with the given id.
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    /// Returns the directed edge with the given id, if it exists.
    #[must_use]
    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    /// The counterpart of `id` on the neighbouring polygon.
    #[must_use]
    pub fn shared(&self, id: EdgeId) -> &Edge {
        self.edge(self.edge(id).shared)
    }

    /// The polygon on the other side of edge `id`.
    #[must_use]
    pub fn shared_polygon(&self, id: EdgeId) -> PolygonId {
        self.shared(id).polygon
    }

    /// Ring edges of a polygon, in ring order.
    pub fn polygon_edges(&self, id: PolygonId) -> impl Iterator<Item = &Edge> + '_ {
        self.polygon(id).edges.iter().map(|&e| self.edge(e))
    }

    /// One directed edge per physical edge (the lower id of each pair).
    #[must_use]
    pub fn unique_edges(&self) -> &[EdgeId] {
        &self.unique_edges
    }

    /// The edge of `from` that borders `to`, if the polygons are adjacent.
    #[must_use]
    pub fn edge_between(&self, from: PolygonId, to: PolygonId) -> Option<&Edge> {
        self.polygon_edges(from)
            .find(|e| self.shared_polygon(e.id) == to)
    }

    /// Interior angle between polygon 0 and its neighbour across edge 0.
    #[must_use]
    pub fn dihedral(&self) -> f64 {
        self.dihedral
    }

    /// Angle between neighbouring normals, `π − dihedral`: the rotation that
    /// opens a hinge flat.
    #[must_use]
    pub fn fold_angle(&self) -> f64 {
        PI - self.dihedral
    }

    /// Distance from the origin to polygon 0's center.
    #[must_use]
    pub fn face_radius(&self) -> f64 {
        self.face_radius
    }

    /// First polygon (in index order) that contains `point`.
    ///
    /// A point on a shared edge or vertex resolves to the lowest polygon index.
    #[must_use]
    pub fn find_containing_polygon(&self, point: &Point3) -> Option<PolygonId> {
        self.polygons
            .iter()
            .find(|p| p.contains_point(point))
            .map(|p| p.id)
    }

    /// Casts a ray from the origin along `direction` onto the surface.
    #[must_use]
    pub fn project_vector(&self, direction: &Vector3) -> Option<ProjectedPoint> {
        ProjectVector::new(*direction).execute(self)
    }

    /// Splits the surface path between two surface points into per-polygon
    /// segments.
    ///
    /// # Errors
    ///
    /// See [`ProjectLineSegment::execute`].
    pub fn project_line_segment(&self, a: &Point3, b: &Point3) -> Result<Vec<ProjectedSegment>> {
        ProjectLineSegment::new(*a, *b).execute(self)
    }

    /// Projects a local curve patch onto the surface along `direction`.
    ///
    /// # Errors
    ///
    /// See [`ProjectCurvePath::execute`].
    pub fn project_curve_path(
        &self,
        path: &CurvePath,
        direction: &Vector3,
    ) -> Result<Vec<ProjectedPath>> {
        ProjectCurvePath::new(path, *direction).execute(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn dodecahedron() -> Topology {
        Topology::new(&Mesh::regular(Solid::Dodecahedron, 1.0)).unwrap()
    }

    #[test]
    fn dodecahedron_counts() {
        let topology = dodecahedron();
        assert_eq!(topology.polygon_count(), 12);
        assert_eq!(topology.unique_edges().len(), 30);
        assert_eq!(topology.vertices().len(), 20);
        assert!(topology.polygons().iter().all(|p| p.edge_count() == 5));
    }

    #[test]
    fn dodecahedron_dihedral() {
        let topology = dodecahedron();
        let expected = (-(5.0_f64.sqrt()) / 5.0).acos();
        assert_abs_diff_eq!(topology.dihedral(), expected, epsilon = 1e-9);
        assert_abs_diff_eq!(topology.dihedral().to_degrees(), 116.565, epsilon = 1e-3);
    }

    #[test]
    fn cube_dihedral_is_right_angle() {
        let topology = Topology::new(&Mesh::regular(Solid::Cube, 1.0)).unwrap();
        assert_abs_diff_eq!(topology.dihedral(), PI / 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(topology.fold_angle(), PI / 2.0, epsilon = 1e-9);
        // Cube of circumradius 1 has inradius 1/√3.
        assert_abs_diff_eq!(topology.face_radius(), 1.0 / 3.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn solid_counts() {
        for (solid, edges, vertices) in [
            (Solid::Tetrahedron, 6, 4),
            (Solid::Cube, 12, 8),
            (Solid::Octahedron, 12, 6),
            (Solid::Dodecahedron, 30, 20),
            (Solid::Icosahedron, 30, 12),
        ] {
            let topology = Topology::new(&Mesh::regular(solid, 1.0)).unwrap();
            assert_eq!(topology.polygon_count(), solid.face_count());
            assert_eq!(topology.unique_edges().len(), edges);
            assert_eq!(topology.vertices().len(), vertices);
        }
    }

    #[test]
    fn containing_polygon_of_centers() {
        let topology = dodecahedron();
        for polygon in topology.polygons() {
            assert_eq!(topology.find_containing_polygon(&polygon.center), Some(polygon.id));
        }
        assert!(topology.find_containing_polygon(&Point3::origin()).is_none());
    }

    #[test]
    fn shared_vertex_resolves_to_lowest_index() {
        let topology = dodecahedron();
        let vertex = topology.vertices()[0];
        let owners: Vec<PolygonId> = topology
            .polygons()
            .iter()
            .filter(|p| p.vertices.contains(&0))
            .map(|p| p.id)
            .collect();
        assert_eq!(owners.len(), 3);
        assert_eq!(topology.find_containing_polygon(&vertex), owners.first().copied());
    }

    #[test]
    fn adjacency_lookup() {
        let topology = dodecahedron();
        let first = PolygonId(0);
        let neighbour = topology.shared_polygon(topology.polygon(first).edges[0]);
        let edge = topology.edge_between(first, neighbour).unwrap();
        assert_eq!(edge.polygon, first);
        assert!(topology.edge_between(first, first).is_none());
    }

    #[test]
    fn empty_mesh_is_rejected() {
        assert!(Topology::new(&Mesh::default()).is_err());
    }
}
