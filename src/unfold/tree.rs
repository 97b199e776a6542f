use std::collections::HashSet;

use slotmap::SlotMap;
use tracing::debug;

use crate::error::{Result, UnfoldError};
use crate::math::transform::{align_to_z, rotation_about, translation};
use crate::math::Matrix4;
use crate::topology::{EdgeId, EdgeKey, PolygonId, Topology};

use super::ease::linear;
use super::net::{EdgeRef, NetDescriptor, NetStep};

slotmap::new_key_type! {
    /// Key of a node in an [`UnfoldTree`].
    pub struct NodeId;
}

/// One polygon of the net and the edge it hangs from.
///
/// For the root, `edge` is the edge the net was started from; for every
/// other node it is the edge of `polygon` that is glued to the parent.
#[derive(Debug, Clone)]
pub struct UnfoldNode {
    pub edge: EdgeId,
    pub polygon: PolygonId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub depth: usize,
}

/// A spanning tree over the polygons of a topology. Tree edges are folds,
/// every other edge is cut.
#[derive(Debug, Clone)]
pub struct UnfoldTree {
    nodes: SlotMap<NodeId, UnfoldNode>,
    root: NodeId,
    by_polygon: Vec<NodeId>,
    folds: HashSet<EdgeKey>,
}

impl UnfoldTree {
    /// Returns the root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the polygon the net is unfolded around.
    #[must_use]
    pub fn root_polygon(&self) -> PolygonId {
        self.nodes[self.root].polygon
    }

    /// Returns the node with the given id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&UnfoldNode> {
        self.nodes.get(id)
    }

    /// Returns the number of nodes, one per polygon.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node holding `polygon`.
    #[must_use]
    pub fn node_for_polygon(&self, polygon: PolygonId) -> Option<NodeId> {
        self.by_polygon.get(polygon.index()).copied()
    }

    /// Node ids with every parent before its children, children in net order.
    #[must_use]
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(node) = self.nodes.get(id) {
                stack.extend(node.children.iter().rev());
            }
        }
        order
    }

    /// Rotation of `node` relative to its parent at animation time `t`.
    ///
    /// The polygon turns about its entry edge by `ease(t)` of the fold
    /// angle. At `t = 0` the polyhedron is closed, at `t = 1` the polygon
    /// lies in its parent's plane. The root never moves.
    #[must_use]
    pub fn hinge(
        &self,
        topology: &Topology,
        node: NodeId,
        t: f64,
        ease: impl Fn(f64) -> f64,
    ) -> Matrix4 {
        let Some(node) = self.nodes.get(node).filter(|n| n.parent.is_some()) else {
            return Matrix4::identity();
        };
        let edge = topology.edge(node.edge);
        let Some(axis) = edge.vector().try_normalize(0.0) else {
            return Matrix4::identity();
        };
        rotation_about(edge.start_point(), &axis, ease(t) * topology.fold_angle())
    }

    /// Absolute transform of every polygon at time `t`, indexed by polygon.
    #[must_use]
    pub fn polygon_transforms(
        &self,
        topology: &Topology,
        t: f64,
        ease: impl Fn(f64) -> f64,
    ) -> Vec<Matrix4> {
        let mut transforms = vec![Matrix4::identity(); topology.polygon_count()];
        for id in self.preorder() {
            let node = &self.nodes[id];
            let parent = node
                .parent
                .map_or_else(Matrix4::identity, |p| transforms[self.nodes[p].polygon.index()]);
            transforms[node.polygon.index()] = parent * self.hinge(topology, id, t, &ease);
        }
        transforms
    }

    /// Fully unfolded transforms, moved so the root polygon lies in the XY
    /// plane centred on the origin.
    #[must_use]
    pub fn flatten(&self, topology: &Topology) -> Vec<Matrix4> {
        let root = topology.polygon(self.root_polygon());
        let to_plane = align_to_z(root.normal()) * translation(&(-root.center.coords));
        self.polygon_transforms(topology, 1.0, linear)
            .into_iter()
            .map(|m| to_plane * m)
            .collect()
    }

    /// Edge keys glued in the net.
    #[must_use]
    pub fn fold_edges(&self) -> &HashSet<EdgeKey> {
        &self.folds
    }

    #[must_use]
    pub fn is_fold(&self, key: EdgeKey) -> bool {
        self.folds.contains(&key)
    }

    /// Edges of `polygon` that are cut, in ring order.
    #[must_use]
    pub fn cut_edges(&self, topology: &Topology, polygon: PolygonId) -> Vec<EdgeId> {
        topology
            .polygon_edges(polygon)
            .filter(|e| !self.is_fold(e.key))
            .map(|e| e.id)
            .collect()
    }
}

/// Follows a [`NetDescriptor`] from a root edge to build an [`UnfoldTree`].
#[derive(Debug, Clone, Copy)]
pub struct BuildUnfoldTree<'a> {
    root_edge: EdgeId,
    net: &'a NetDescriptor,
}

impl<'a> BuildUnfoldTree<'a> {
    #[must_use]
    pub fn new(root_edge: EdgeId, net: &'a NetDescriptor) -> Self {
        Self { root_edge, net }
    }

    /// # Errors
    ///
    /// - [`UnfoldError::UnknownEdge`] if the root edge is not in `topology`.
    /// - [`UnfoldError::EdgeOutOfRange`] if a step names an edge the
    ///   current polygon does not have.
    /// - [`UnfoldError::PolygonRevisited`] if a step lands on a polygon
    ///   already in the tree.
    /// - [`UnfoldError::IncompleteNet`] if some polygon is never reached.
    pub fn execute(&self, topology: &Topology) -> Result<UnfoldTree> {
        let root_edge = topology
            .get_edge(self.root_edge)
            .ok_or(UnfoldError::UnknownEdge(self.root_edge))?;

        let total = topology.polygon_count();
        let mut nodes: SlotMap<NodeId, UnfoldNode> = SlotMap::with_capacity_and_key(total);
        let mut by_polygon: Vec<Option<NodeId>> = vec![None; total];
        let mut folds = HashSet::with_capacity(total);
        let mut root = None;

        let mut stack: Vec<(EdgeId, Option<NodeId>, &[NetStep])> =
            vec![(root_edge.id, None, self.net.steps.as_slice())];
        while let Some((edge_id, parent, steps)) = stack.pop() {
            let edge = topology.edge(edge_id);
            let polygon = edge.polygon;
            if by_polygon[polygon.index()].is_some() {
                return Err(UnfoldError::PolygonRevisited(polygon).into());
            }

            let depth = parent.and_then(|p| nodes.get(p)).map_or(0, |p| p.depth + 1);
            let id = nodes.insert(UnfoldNode {
                edge: edge_id,
                polygon,
                parent,
                children: Vec::new(),
                depth,
            });
            by_polygon[polygon.index()] = Some(id);
            match parent.and_then(|p| nodes.get_mut(p)) {
                Some(parent) => {
                    parent.children.push(id);
                    folds.insert(edge.key);
                }
                None => root = Some(id),
            }

            let ring = &topology.polygon(polygon).edges;
            // Reversed so children pop in net order.
            for step in steps.iter().rev() {
                let index = resolve(step.target, edge.index, ring.len()).ok_or(
                    UnfoldError::EdgeOutOfRange {
                        polygon,
                        index: raw_index(step.target),
                        len: ring.len(),
                    },
                )?;
                stack.push((topology.edge(ring[index]).shared, Some(id), step.next.as_slice()));
            }
        }

        let visited = nodes.len();
        let by_polygon: Option<Vec<NodeId>> = by_polygon.into_iter().collect();
        let (Some(root), Some(by_polygon)) = (root, by_polygon) else {
            return Err(UnfoldError::IncompleteNet { visited, total }.into());
        };

        debug!(
            root = %topology.edge(self.root_edge).polygon,
            polygons = visited,
            folds = folds.len(),
            "built unfold tree"
        );
        Ok(UnfoldTree {
            nodes,
            root,
            by_polygon,
            folds,
        })
    }
}

/// Ring position named by `target` in a polygon of `len` edges entered
/// through position `entry`.
fn resolve(target: EdgeRef, entry: usize, len: usize) -> Option<usize> {
    match target {
        EdgeRef::Absolute(index) => (index < len).then_some(index),
        EdgeRef::Relative(offset) => {
            if offset.unsigned_abs() >= len {
                return None;
            }
            let len = isize::try_from(len).ok()?;
            let entry = isize::try_from(entry).ok()?;
            usize::try_from((entry + offset).rem_euclid(len)).ok()
        }
    }
}

fn raw_index(target: EdgeRef) -> isize {
    match target {
        EdgeRef::Absolute(index) => isize::try_from(index).unwrap_or(isize::MAX),
        EdgeRef::Relative(offset) => offset,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::error::StarfoldError;
    use crate::math::transform::transform_point;
    use crate::topology::{Mesh, Solid};
    use crate::unfold::ease::sine_in_out;

    fn topology(solid: Solid) -> Topology {
        Topology::new(&Mesh::regular(solid, 1.0)).unwrap()
    }

    fn build(topology: &Topology, root: usize, net: &NetDescriptor) -> Result<UnfoldTree> {
        BuildUnfoldTree::new(EdgeId(root), net).execute(topology)
    }

    #[test]
    fn presets_span_from_every_root_edge() {
        for solid in [Solid::Cube, Solid::Dodecahedron, Solid::Icosahedron] {
            let topology = topology(solid);
            let net = NetDescriptor::for_topology(&topology);
            for root in 0..topology.edges().len() {
                let tree = build(&topology, root, &net).unwrap();
                assert_eq!(tree.len(), topology.polygon_count(), "{solid:?} root {root}");
                assert_eq!(tree.fold_edges().len(), topology.polygon_count() - 1);
                for polygon in topology.polygons() {
                    let node = tree.node_for_polygon(polygon.id).unwrap();
                    assert_eq!(tree.node(node).unwrap().polygon, polygon.id);
                }
            }
        }
    }

    #[test]
    fn children_follow_net_order() {
        let topology = topology(Solid::Cube);
        let tree = build(&topology, 0, &NetDescriptor::cube()).unwrap();
        let root = tree.node(tree.root()).unwrap();
        assert_eq!(root.depth, 0);
        assert_eq!(root.children.len(), 4);

        let ring = &topology.polygon(root.polygon).edges;
        for (child, index) in root.children.iter().zip([0, 1, 3, 2]) {
            let node = tree.node(*child).unwrap();
            assert_eq!(node.parent, Some(tree.root()));
            assert_eq!(node.depth, 1);
            assert_eq!(node.edge, topology.edge(ring[index]).shared);
        }

        let order = tree.preorder();
        assert_eq!(order.len(), 6);
        assert_eq!(order[0], tree.root());
    }

    #[test]
    fn out_of_range_steps_are_rejected() {
        let topology = topology(Solid::Cube);
        let net = NetDescriptor::new(vec![NetStep::absolute(4)]);
        assert!(matches!(
            build(&topology, 0, &net),
            Err(StarfoldError::Unfold(UnfoldError::EdgeOutOfRange { index: 4, len: 4, .. }))
        ));
        let net =
            NetDescriptor::new(vec![NetStep::absolute(0).with_next(vec![NetStep::relative(-4)])]);
        assert!(matches!(
            build(&topology, 0, &net),
            Err(StarfoldError::Unfold(UnfoldError::EdgeOutOfRange { index: -4, .. }))
        ));
    }

    #[test]
    fn stepping_back_revisits() {
        let topology = topology(Solid::Cube);
        let net =
            NetDescriptor::new(vec![NetStep::absolute(0).with_next(vec![NetStep::relative(0)])]);
        assert!(matches!(
            build(&topology, 0, &net),
            Err(StarfoldError::Unfold(UnfoldError::PolygonRevisited(_)))
        ));
    }

    #[test]
    fn partial_net_is_incomplete() {
        let topology = topology(Solid::Cube);
        let net = NetDescriptor::new(vec![NetStep::absolute(0)]);
        assert!(matches!(
            build(&topology, 0, &net),
            Err(StarfoldError::Unfold(UnfoldError::IncompleteNet { visited: 2, total: 6 }))
        ));
    }

    #[test]
    fn unknown_root_edge() {
        let topology = topology(Solid::Cube);
        assert!(matches!(
            build(&topology, 999, &NetDescriptor::cube()),
            Err(StarfoldError::Unfold(UnfoldError::UnknownEdge(EdgeId(999))))
        ));
    }

    #[test]
    fn closed_at_time_zero() {
        let topology = topology(Solid::Dodecahedron);
        let tree = build(&topology, 3, &NetDescriptor::dodecahedron()).unwrap();
        for transform in tree.polygon_transforms(&topology, 0.0, linear) {
            assert_abs_diff_eq!(transform, Matrix4::identity(), epsilon = 1e-12);
        }
        assert_abs_diff_eq!(
            tree.hinge(&topology, tree.root(), 1.0, linear),
            Matrix4::identity(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn eased_hinge_is_half_way_at_midpoint() {
        let topology = topology(Solid::Cube);
        let tree = build(&topology, 0, &NetDescriptor::cube()).unwrap();
        let child = tree.node(tree.root()).unwrap().children[0];
        let eased = tree.hinge(&topology, child, 0.5, sine_in_out);
        let half = tree.hinge(&topology, child, 0.5, linear);
        assert_abs_diff_eq!(eased, half, epsilon = 1e-12);
    }

    #[test]
    fn flattened_net_is_planar_and_rigid() {
        for solid in [
            Solid::Tetrahedron,
            Solid::Cube,
            Solid::Octahedron,
            Solid::Dodecahedron,
            Solid::Icosahedron,
        ] {
            let topology = topology(solid);
            let net = NetDescriptor::for_topology(&topology);
            let tree = build(&topology, 0, &net).unwrap();
            let flat = tree.flatten(&topology);

            for polygon in topology.polygons() {
                let m = &flat[polygon.id.index()];
                for &v in &polygon.vertices {
                    let p = transform_point(m, &topology.vertices()[v]);
                    assert!(p.z.abs() < 1e-9, "{solid:?} polygon {} off plane", polygon.id);
                }
                for edge in topology.polygon_edges(polygon.id) {
                    let moved = edge.segment.transformed(m);
                    assert_abs_diff_eq!(moved.length(), edge.segment.length(), epsilon = 1e-9);
                }
            }

            let root = topology.polygon(tree.root_polygon());
            let center = transform_point(&flat[root.id.index()], &root.center);
            assert_abs_diff_eq!(center.coords.norm(), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn fold_edges_meet_in_the_flat_net() {
        let topology = topology(Solid::Icosahedron);
        let tree = build(&topology, 7, &NetDescriptor::icosahedron()).unwrap();
        let flat = tree.flatten(&topology);
        for id in tree.preorder().into_iter().skip(1) {
            let node = tree.node(id).unwrap();
            let edge = topology.edge(node.edge);
            let twin = topology.shared(node.edge);
            let here = edge.segment.transformed(&flat[edge.polygon.index()]);
            let there = twin.segment.transformed(&flat[twin.polygon.index()]);
            assert_abs_diff_eq!(here.start, there.end, epsilon = 1e-9);
            assert_abs_diff_eq!(here.end, there.start, epsilon = 1e-9);

            // The folded-out polygon ends up on the far side of the fold.
            let placed_center =
                |id: PolygonId| transform_point(&flat[id.index()], &topology.polygon(id).center);
            let a = placed_center(edge.polygon);
            let b = placed_center(twin.polygon);
            let side = |p: &crate::math::Point3| {
                let d = here.delta();
                d.x * (p.y - here.start.y) - d.y * (p.x - here.start.x)
            };
            assert!(side(&a) * side(&b) < 0.0);
        }
    }

    #[test]
    fn cut_edges_exclude_folds() {
        let topology = topology(Solid::Cube);
        let tree = build(&topology, 0, &NetDescriptor::cube()).unwrap();
        let cuts: usize = topology
            .polygons()
            .iter()
            .map(|p| tree.cut_edges(&topology, p.id).len())
            .sum();
        // 12 edges, 5 glued: 7 cut keys, each seen from two polygons.
        assert_eq!(cuts, 14);
    }

    #[test]
    fn relative_offsets_wrap() {
        assert_eq!(resolve(EdgeRef::Relative(-1), 0, 5), Some(4));
        assert_eq!(resolve(EdgeRef::Relative(3), 4, 5), Some(2));
        assert_eq!(resolve(EdgeRef::Relative(5), 0, 5), None);
        assert_eq!(resolve(EdgeRef::Absolute(2), 4, 3), Some(2));
    }
}
