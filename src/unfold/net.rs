use std::collections::VecDeque;

use crate::topology::{EdgeId, PolygonId, Topology};

/// Which edge of the current polygon to cross next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRef {
    /// Position in the current polygon's ring.
    Absolute(usize),
    /// Offset from the edge the current polygon was entered through.
    Relative(isize),
}

/// One crossing of a net, and the crossings to make from the polygon it
/// lands on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetStep {
    pub target: EdgeRef,
    pub next: Vec<NetStep>,
}

impl NetStep {
    #[must_use]
    pub fn absolute(index: usize) -> Self {
        Self {
            target: EdgeRef::Absolute(index),
            next: Vec::new(),
        }
    }

    #[must_use]
    pub fn relative(offset: isize) -> Self {
        Self {
            target: EdgeRef::Relative(offset),
            next: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_next(mut self, next: Vec<NetStep>) -> Self {
        self.next = next;
        self
    }

    fn count(&self) -> usize {
        1 + self.next.iter().map(NetStep::count).sum::<usize>()
    }
}

/// A spanning tree over polygon adjacency, written as nested edge crossings
/// starting from the root polygon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetDescriptor {
    pub steps: Vec<NetStep>,
}

impl NetDescriptor {
    #[must_use]
    pub fn new(steps: Vec<NetStep>) -> Self {
        Self { steps }
    }

    /// Total number of crossings, i.e. tree edges.
    #[must_use]
    pub fn crossing_count(&self) -> usize {
        self.steps.iter().map(NetStep::count).sum()
    }

    /// Cross-shaped cube net.
    #[must_use]
    pub fn cube() -> Self {
        use NetStep as S;
        Self::new(vec![
            S::absolute(0),
            S::absolute(1),
            S::absolute(3),
            S::absolute(2).with_next(vec![S::relative(2)]),
        ])
    }

    /// Two five-petal flowers joined at their stems.
    #[must_use]
    pub fn dodecahedron() -> Self {
        use NetStep as S;
        let petals = || (1..=4).map(S::relative).collect::<Vec<_>>();
        Self::new(vec![
            S::absolute(1).with_next(petals()),
            S::absolute(4).with_next(vec![S::relative(2).with_next(petals())]),
        ])
    }

    /// Zig-zag strip icosahedron net.
    #[must_use]
    pub fn icosahedron() -> Self {
        use NetStep as S;
        let strip = || {
            S::relative(1).with_next(vec![
                S::relative(1),
                S::relative(2).with_next(vec![
                    S::relative(2),
                    S::relative(1).with_next(vec![
                        S::relative(1),
                        S::relative(2).with_next(vec![S::relative(2)]),
                    ]),
                ]),
            ])
        };
        Self::new(vec![
            S::absolute(2),
            S::absolute(1).with_next(vec![
                S::relative(1),
                S::relative(2).with_next(vec![
                    S::relative(2),
                    S::relative(1).with_next(vec![
                        S::relative(1),
                        S::relative(2).with_next(vec![S::relative(2)]),
                    ]),
                ]),
            ]),
            S::absolute(0).with_next(vec![S::relative(2), strip()]),
        ])
    }

    /// Breadth-first net from `start`: every polygon is reached from the
    /// first already-placed neighbour found, which keeps the net spread out.
    #[must_use]
    pub fn naive(topology: &Topology, start: PolygonId) -> Self {
        // Arena of placed crossings; children are arena indices.
        let mut arena: Vec<(usize, Vec<usize>)> = Vec::new();
        let mut roots: Vec<usize> = Vec::new();
        let mut mapped = vec![false; topology.polygon_count()];
        if let Some(slot) = mapped.get_mut(start.index()) {
            *slot = true;
        } else {
            return Self::default();
        }

        let mut queue: VecDeque<(EdgeId, Option<usize>)> = topology
            .polygon(start)
            .edges
            .iter()
            .map(|&e| (e, None))
            .collect();

        while let Some((edge_id, parent)) = queue.pop_front() {
            let target = topology.shared_polygon(edge_id);
            if mapped[target.index()] {
                continue;
            }
            mapped[target.index()] = true;

            let node = arena.len();
            arena.push((topology.edge(edge_id).index, Vec::new()));
            match parent {
                Some(parent) => arena[parent].1.push(node),
                None => roots.push(node),
            }
            queue.extend(topology.polygon(target).edges.iter().map(|&e| (e, Some(node))));
        }

        Self::new(roots.iter().map(|&r| arena_step(&arena, r)).collect())
    }

    /// Preset for the polygon count of `topology` (cube, dodecahedron,
    /// icosahedron), otherwise a naive net from polygon 0.
    ///
    /// Presets assume the polygon and ring order of
    /// [`Mesh::regular`](crate::topology::Mesh::regular).
    #[must_use]
    pub fn for_topology(topology: &Topology) -> Self {
        match topology.polygon_count() {
            6 => Self::cube(),
            12 => Self::dodecahedron(),
            20 => Self::icosahedron(),
            _ => Self::naive(topology, PolygonId(0)),
        }
    }
}

fn arena_step(arena: &[(usize, Vec<usize>)], node: usize) -> NetStep {
    let (index, children) = &arena[node];
    NetStep::absolute(*index).with_next(children.iter().map(|&c| arena_step(arena, c)).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::topology::{Mesh, Solid};

    #[test]
    fn presets_span_their_solids() {
        assert_eq!(NetDescriptor::cube().crossing_count(), 5);
        assert_eq!(NetDescriptor::dodecahedron().crossing_count(), 11);
        assert_eq!(NetDescriptor::icosahedron().crossing_count(), 19);
    }

    #[test]
    fn naive_net_reaches_every_polygon() {
        for solid in [Solid::Tetrahedron, Solid::Octahedron, Solid::Dodecahedron] {
            let topology = Topology::new(&Mesh::regular(solid, 1.0)).unwrap();
            let net = NetDescriptor::naive(&topology, PolygonId(0));
            assert_eq!(net.crossing_count(), topology.polygon_count() - 1, "{solid:?}");
        }
    }

    #[test]
    fn naive_net_from_missing_polygon_is_empty() {
        let topology = Topology::new(&Mesh::regular(Solid::Cube, 1.0)).unwrap();
        assert_eq!(NetDescriptor::naive(&topology, PolygonId(40)), NetDescriptor::default());
    }

    #[test]
    fn for_topology_picks_presets() {
        let cube = Topology::new(&Mesh::regular(Solid::Cube, 1.0)).unwrap();
        assert_eq!(NetDescriptor::for_topology(&cube), NetDescriptor::cube());
        let octa = Topology::new(&Mesh::regular(Solid::Octahedron, 1.0)).unwrap();
        assert_eq!(NetDescriptor::for_topology(&octa).crossing_count(), 7);
    }
}
