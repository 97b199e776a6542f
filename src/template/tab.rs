use std::collections::HashSet;
use std::f64::consts::{PI, TAU};

use tracing::debug;

use crate::geometry::Segment;
use crate::math::transform::{rotation_z, transform_point, translation};
use crate::math::triangle::Triangle;
use crate::math::{angle_between, Matrix4, Point3, Vector3, EPSILON};
use crate::topology::{Edge, EdgeId, EdgeKey, PolygonId, Topology};
use crate::unfold::UnfoldTree;

/// A glue flap on a cut edge of the net.
///
/// `quad` is the flap as drawn next to its own polygon. `overlap` is the
/// same flap moved onto the neighbouring polygon, i.e. the region it covers
/// once the net is glued. `to_target` maps the first onto the second and
/// `to_tab` maps back.
#[derive(Debug, Clone)]
pub struct Tab {
    pub edge: EdgeId,
    pub key: EdgeKey,
    pub polygon: PolygonId,
    pub target_polygon: PolygonId,
    pub quad: [Point3; 4],
    pub overlap: [Point3; 4],
    pub overlap_edges: [Segment; 4],
    pub triangles: [Triangle; 2],
    pub to_target: Matrix4,
    pub to_tab: Matrix4,
}

impl Tab {
    /// Whether `point` lies in the overlap region. With `exclude_boundary`
    /// points on the overlap outline count as outside.
    #[must_use]
    pub fn contains_point(&self, point: &Point3, exclude_boundary: bool) -> bool {
        let inside = self.triangles.iter().any(|t| t.contains_point(point));
        inside && !(exclude_boundary && self.overlap_edges.iter().any(|e| e.contains_point(point)))
    }

    /// The drawn outline of the flap, excluding the edge it hangs from.
    #[must_use]
    pub fn outline(&self) -> [Segment; 3] {
        let [a, b, c, d] = self.quad;
        [Segment::new(a, b), Segment::new(b, c), Segment::new(c, d)]
    }
}

/// Flap side angle for `edge`: whatever is left of a full turn after
/// fitting whole interior angles, or the interior angle when they tile.
#[must_use]
pub fn tab_angle(topology: &Topology, edge: &Edge) -> f64 {
    let next = topology.edge(edge.next);
    let interior = PI - angle_between(&edge.vector(), &next.vector()).unwrap_or(0.0);
    let remaining = TAU % interior;
    if remaining < EPSILON || interior - remaining < EPSILON {
        interior
    } else {
        remaining
    }
}

/// Fraction of the edge kept for the outer side of a flap of `height` on a
/// base of `base` with side angle `angle`.
///
/// Falls back to the full base when the sides would cross.
fn base_factor(base: f64, height: f64, angle: f64) -> f64 {
    if base < EPSILON {
        return 1.0;
    }
    let resulting = base - 2.0 * height / angle.tan();
    if resulting > 0.0 {
        (resulting / base).min(1.0)
    } else {
        debug!(base, height, angle, "tab sides cross, using the full edge");
        1.0
    }
}

/// Builds tabs for edges of a net laid out by `transforms` (one per polygon).
#[derive(Debug, Clone, Copy)]
pub struct TabMaker<'a> {
    topology: &'a Topology,
    transforms: &'a [Matrix4],
    tab_scale: f64,
}

impl<'a> TabMaker<'a> {
    #[must_use]
    pub fn new(topology: &'a Topology, transforms: &'a [Matrix4], tab_scale: f64) -> Self {
        Self {
            topology,
            transforms,
            tab_scale,
        }
    }

    /// The tab on `edge`, drawn on the edge's own polygon and overlapping
    /// the polygon across it.
    #[must_use]
    pub fn make(&self, edge: EdgeId) -> Tab {
        let edge = self.topology.edge(edge);
        let transform = &self.transforms[edge.polygon.index()];
        let flat = edge.segment.transformed(transform);
        let base = flat.length();
        let height = base * self.tab_scale;
        let factor = base_factor(base, height, tab_angle(self.topology, edge));

        let center = transform_point(transform, &self.topology.polygon(edge.polygon).center);
        let outward = (flat.center() - center)
            .try_normalize(0.0)
            .unwrap_or_else(Vector3::zeros)
            * height;
        let quad = [
            flat.start,
            flat.at(0.5 - factor / 2.0) + outward,
            flat.at(0.5 + factor / 2.0) + outward,
            flat.end,
        ];

        let twin = self.topology.shared(edge.id);
        let target = twin.segment.transformed(&self.transforms[twin.polygon.index()]);
        let vector = flat.delta();
        let target_vector = -target.delta();
        let angle = angle_between(&vector, &target_vector).unwrap_or(0.0);
        let cross = vector.cross(&target_vector).z;
        let rotation = if cross.abs() > EPSILON {
            angle * cross.signum()
        } else {
            angle
        };

        let to_target = translation(&target.end.coords)
            * rotation_z(rotation)
            * translation(&(-flat.start.coords));
        let to_tab = translation(&flat.start.coords)
            * rotation_z(-rotation)
            * translation(&(-target.end.coords));

        let overlap = quad.map(|p| transform_point(&to_target, &p));
        let [o0, o1, o2, o3] = overlap;
        Tab {
            edge: edge.id,
            key: edge.key,
            polygon: edge.polygon,
            target_polygon: twin.polygon,
            quad,
            overlap,
            overlap_edges: [
                Segment::new(o0, o1),
                Segment::new(o1, o2),
                Segment::new(o2, o3),
                Segment::new(o3, o0),
            ],
            triangles: [Triangle::new(o0, o3, o1), Triangle::new(o3, o2, o1)],
            to_target,
            to_tab,
        }
    }
}

/// One tab per cut edge key, attached to the first polygon in index order
/// that has the edge as a cut.
#[must_use]
pub fn generate_tabs(
    topology: &Topology,
    tree: &UnfoldTree,
    transforms: &[Matrix4],
    tab_scale: f64,
) -> Vec<Tab> {
    let maker = TabMaker::new(topology, transforms, tab_scale);
    let mut seen = HashSet::new();
    let tabs: Vec<Tab> = topology
        .polygons()
        .iter()
        .flat_map(|polygon| tree.cut_edges(topology, polygon.id))
        .filter(|&id| seen.insert(topology.edge(id).key))
        .map(|id| maker.make(id))
        .collect();
    debug!(tabs = tabs.len(), "generated tabs");
    tabs
}

/// Tabs owned by other polygons that are glued over `polygon`.
pub fn overlapping_tabs<'t>(
    topology: &'t Topology,
    tabs: &'t [Tab],
    polygon: PolygonId,
) -> impl Iterator<Item = &'t Tab> + 't {
    tabs.iter().filter(move |tab| {
        tab.polygon != polygon && topology.polygon_edges(polygon).any(|e| e.key == tab.key)
    })
}
