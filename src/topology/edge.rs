use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::geometry::Segment;
use crate::math::{Point3, Vector3};

use super::polygon::{Polygon, PolygonId};

/// Index of an edge within its [`Topology`](super::Topology).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

impl EdgeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unordered vertex pair identifying an edge independent of which polygon
/// it is seen from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(usize, usize);

impl EdgeKey {
    #[must_use]
    pub fn new(a: usize, b: usize) -> Self {
        Self(a.min(b), a.max(b))
    }

    /// The two vertex indices, smallest first.
    #[must_use]
    pub const fn vertices(self) -> (usize, usize) {
        (self.0, self.1)
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

/// A directed boundary edge of one polygon.
#[derive(Debug, Clone)]
pub struct Edge {
    pub id: EdgeId,
    pub key: EdgeKey,
    pub polygon: PolygonId,
    /// Position of this edge in its polygon's ring.
    pub index: usize,
    /// Start vertex index.
    pub start: usize,
    /// End vertex index.
    pub end: usize,
    pub segment: Segment,
    pub next: EdgeId,
    pub prev: EdgeId,
    /// The same edge seen from the neighbouring polygon, running the other way.
    pub shared: EdgeId,
}

impl Edge {
    /// Vector from the start vertex to the end vertex.
    #[must_use]
    pub fn vector(&self) -> Vector3 {
        self.segment.delta()
    }

    /// Returns the point the edge starts at.
    #[must_use]
    pub fn start_point(&self) -> &Point3 {
        &self.segment.start
    }
}

/// Builds every polygon's ring edges, links each to its counterpart on the
/// neighbouring polygon and fills in [`Polygon::edges`].
///
/// Returns all edges plus one representative per key (the lower id).
pub(crate) fn link_edges(
    polygons: &mut [Polygon],
    vertices: &[Point3],
) -> Result<(Vec<Edge>, Vec<EdgeId>)> {
    struct Draft {
        key: EdgeKey,
        polygon: PolygonId,
        index: usize,
        start: usize,
        end: usize,
        next: EdgeId,
        prev: EdgeId,
    }

    let mut drafts: Vec<Draft> = Vec::new();
    for polygon in polygons.iter_mut() {
        let base = drafts.len();
        let n = polygon.vertices.len();
        polygon.edges = (0..n).map(|i| EdgeId(base + i)).collect();
        for i in 0..n {
            let start = polygon.vertices[i];
            let end = polygon.vertices[(i + 1) % n];
            drafts.push(Draft {
                key: EdgeKey::new(start, end),
                polygon: polygon.id,
                index: i,
                start,
                end,
                next: EdgeId(base + (i + 1) % n),
                prev: EdgeId(base + (i + n - 1) % n),
            });
        }
    }

    let mut by_key: BTreeMap<EdgeKey, Vec<EdgeId>> = BTreeMap::new();
    for (i, draft) in drafts.iter().enumerate() {
        by_key.entry(draft.key).or_default().push(EdgeId(i));
    }

    let mut shared = vec![EdgeId(0); drafts.len()];
    let mut unique = Vec::with_capacity(by_key.len());
    for (key, ids) in &by_key {
        let &[a, b] = ids.as_slice() else {
            return Err(TopologyError::NonManifoldTopology {
                key: *key,
                count: ids.len(),
            }
            .into());
        };
        if drafts[a.0].polygon == drafts[b.0].polygon {
            return Err(TopologyError::NonManifoldTopology { key: *key, count: 2 }.into());
        }
        shared[a.0] = b;
        shared[b.0] = a;
        unique.push(a.min(b));
    }
    unique.sort_unstable();

    let edges: Vec<Edge> = drafts
        .into_iter()
        .zip(shared)
        .enumerate()
        .map(|(i, (draft, shared))| Edge {
            id: EdgeId(i),
            key: draft.key,
            polygon: draft.polygon,
            index: draft.index,
            start: draft.start,
            end: draft.end,
            segment: Segment::new(vertices[draft.start], vertices[draft.end]),
            next: draft.next,
            prev: draft.prev,
            shared,
        })
        .collect();

    debug!(edges = edges.len(), unique = unique.len(), "linked edges");
    Ok((edges, unique))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::StarfoldError;
    use crate::topology::mesh::{Mesh, MeshTriangle};
    use crate::topology::polygon::organize_polygons;
    use crate::topology::solids::Solid;

    fn linked(mesh: &Mesh) -> Result<(Vec<Polygon>, Vec<Edge>, Vec<EdgeId>)> {
        let mut polygons = organize_polygons(mesh)?;
        let (edges, unique) = link_edges(&mut polygons, &mesh.vertices)?;
        Ok((polygons, edges, unique))
    }

    #[test]
    fn edge_key_is_unordered() {
        assert_eq!(EdgeKey::new(3, 1), EdgeKey::new(1, 3));
        assert_eq!(EdgeKey::new(3, 1).vertices(), (1, 3));
        assert_eq!(EdgeKey::new(3, 1).to_string(), "1-3");
    }

    #[test]
    fn shared_links_are_symmetric() {
        let (_, edges, unique) = linked(&Mesh::regular(Solid::Dodecahedron, 1.0)).unwrap();
        assert_eq!(edges.len(), 60);
        assert_eq!(unique.len(), 30);
        for edge in &edges {
            let other = &edges[edge.shared.0];
            assert_eq!(other.shared, edge.id);
            assert_eq!(other.key, edge.key);
            assert_ne!(other.polygon, edge.polygon);
            assert_eq!((other.start, other.end), (edge.end, edge.start));
        }
    }

    #[test]
    fn ring_links_cycle() {
        let (polygons, edges, _) = linked(&Mesh::regular(Solid::Cube, 1.0)).unwrap();
        for polygon in &polygons {
            for &id in &polygon.edges {
                let edge = &edges[id.0];
                assert_eq!(edges[edge.next.0].prev, id);
                assert_eq!(edges[edge.next.0].start, edge.end);
                assert_eq!(edge.polygon, polygon.id);
            }
        }
    }

    #[test]
    fn open_mesh_is_non_manifold() {
        let mut mesh = Mesh::regular(Solid::Cube, 1.0);
        mesh.triangles.truncate(10);
        let err = linked(&mesh).err().unwrap();
        assert!(matches!(
            err,
            StarfoldError::Topology(TopologyError::NonManifoldTopology { count: 1, .. })
        ));
    }

    #[test]
    fn duplicated_face_is_non_manifold() {
        let mut mesh = Mesh::regular(Solid::Tetrahedron, 1.0);
        let first = mesh.triangles[0];
        let [a, b, c] = first.indices;
        let flipped = MeshTriangle::new([a, c, b], -first.normal);
        mesh.triangles.push(flipped);
        let err = linked(&mesh).err().unwrap();
        assert!(matches!(
            err,
            StarfoldError::Topology(TopologyError::NonManifoldTopology { count: 3, .. })
        ));
    }
}
