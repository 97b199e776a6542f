//! Copying page content that falls under a glued tab onto the tab itself,
//! so it stays visible after assembly.

use crate::geometry::{CubicBezier, CurvePath, Segment};
use crate::math::intersect_2d::segment_crossings_2d;
use crate::math::transform::transform_point;
use crate::math::{Point3, TOLERANCE};

use super::Tab;

/// Pieces of `path` lying inside `tab`'s overlap, moved into tab space.
///
/// Curves are cut wherever they cross the overlap outline; the pieces
/// strictly inside are kept and rejoined into continuous paths.
#[must_use]
pub fn clip_path_to_tab(path: &CurvePath, tab: &Tab) -> Vec<CurvePath> {
    let kept: CurvePath = path
        .curves()
        .iter()
        .flat_map(|curve| split_at_outline(curve, &tab.overlap_edges))
        .filter(|piece| tab.contains_point(&piece.point_at(0.5), true))
        .collect();

    kept.split_continuous()
        .into_iter()
        .map(|run| run.transformed(&tab.to_tab))
        .collect()
}

/// The part of `segment` inside `tab`'s overlap, moved into tab space.
///
/// The overlap is convex so there is at most one such part.
#[must_use]
pub fn clip_segment_to_tab(segment: &Segment, tab: &Tab) -> Option<Segment> {
    let outline: Vec<(Point3, Point3)> =
        tab.overlap_edges.iter().map(|e| (e.start, e.end)).collect();

    let mut cuts = vec![0.0];
    cuts.extend(segment_crossings_2d(&segment.start, &segment.end, &outline));
    cuts.push(1.0);

    cuts.windows(2)
        .map(|w| Segment::new(segment.at(w[0]), segment.at(w[1])))
        .find(|piece| tab.contains_point(&piece.center(), true))
        .map(|piece| piece.transformed(&tab.to_tab))
}

/// `point` moved into tab space if it lies strictly inside the overlap.
#[must_use]
pub fn clip_point_to_tab(point: &Point3, tab: &Tab) -> Option<Point3> {
    tab.contains_point(point, true)
        .then(|| transform_point(&tab.to_tab, point))
}

/// Splits `curve` at every crossing with `outline`.
fn split_at_outline(curve: &CubicBezier, outline: &[Segment]) -> Vec<CubicBezier> {
    let mut ts: Vec<f64> = outline
        .iter()
        .flat_map(|edge| curve.intersect_segment(edge))
        .map(|hit| hit.t)
        .filter(|t| *t > TOLERANCE && *t < 1.0 - TOLERANCE)
        .collect();
    ts.sort_by(f64::total_cmp);
    ts.dedup_by(|a, b| (*a - *b).abs() < TOLERANCE);

    let mut pieces = Vec::with_capacity(ts.len() + 1);
    let mut rest = *curve;
    let mut consumed = 0.0;
    for t in ts {
        // Re-parameterise onto what is left after the previous split.
        let (head, tail) = rest.split_at((t - consumed) / (1.0 - consumed));
        pieces.push(head);
        rest = tail;
        consumed = t;
    }
    pieces.push(rest);
    pieces
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::shapes::bezier_circle;
    use crate::math::centroid;
    use crate::math::transform::translation;
    use crate::math::{Matrix4, Vector3};
    use crate::template::TabMaker;
    use crate::topology::{EdgeId, Mesh, Solid, Topology};
    use crate::unfold::{BuildUnfoldTree, NetDescriptor};

    fn tab() -> Tab {
        let topology = Topology::new(&Mesh::regular(Solid::Cube, 1.0)).unwrap();
        let net = NetDescriptor::cube();
        let tree = BuildUnfoldTree::new(EdgeId(0), &net).execute(&topology).unwrap();
        let flat: Vec<Matrix4> = tree.flatten(&topology);
        TabMaker::new(&topology, &flat, 0.2).make(EdgeId(5))
    }

    fn inside_in_tab_space(tab: &Tab, point: &Point3) -> bool {
        tab.contains_point(&transform_point(&tab.to_target, point), false)
    }

    #[test]
    fn segment_leaving_the_tab_is_cut_at_the_outline() {
        let tab = tab();
        let middle = centroid(&tab.overlap).unwrap();
        let far = middle + (middle - tab.overlap[0]) * 20.0;
        let clipped = clip_segment_to_tab(&Segment::new(middle, far), &tab).unwrap();

        assert_abs_diff_eq!(clipped.start, transform_point(&tab.to_tab, &middle), epsilon = 1e-9);
        let end = transform_point(&tab.to_target, &clipped.end);
        assert!(tab.overlap_edges.iter().any(|e| e.contains_point(&end)));
        assert!(inside_in_tab_space(&tab, &clipped.center()));
    }

    #[test]
    fn segments_wholly_inside_or_outside() {
        let tab = tab();
        let a = centroid(&tab.overlap).unwrap();
        let b = Point3::from((a.coords + tab.overlap[1].coords + tab.overlap[2].coords) / 3.0);
        let whole = clip_segment_to_tab(&Segment::new(a, b), &tab).unwrap();
        assert_abs_diff_eq!(whole.end, transform_point(&tab.to_tab, &b), epsilon = 1e-9);

        let away = Segment::new(Point3::new(50.0, 50.0, 0.0), Point3::new(60.0, 50.0, 0.0));
        assert!(clip_segment_to_tab(&away, &tab).is_none());
    }

    #[test]
    fn small_circle_inside_is_copied_whole() {
        let tab = tab();
        let middle = centroid(&tab.overlap).unwrap();
        let circle = bezier_circle(0.005).transformed(&translation(&middle.coords));
        let clipped = clip_path_to_tab(&circle, &tab);
        assert_eq!(clipped.len(), 1);
        assert_eq!(clipped[0].len(), 4);
    }

    #[test]
    fn large_circle_keeps_only_the_inside() {
        let tab = tab();
        let corner = tab.overlap[1];
        let circle = bezier_circle(0.1).transformed(&translation(&corner.coords));
        let clipped = clip_path_to_tab(&circle, &tab);

        assert!(!clipped.is_empty());
        for path in &clipped {
            for curve in path.curves() {
                assert!(inside_in_tab_space(&tab, &curve.point_at(0.5)));
                assert!(inside_in_tab_space(&tab, &curve.start()));
                assert!(inside_in_tab_space(&tab, &curve.end()));
            }
        }
    }

    #[test]
    fn circle_elsewhere_is_dropped() {
        let tab = tab();
        let circle = bezier_circle(0.1).transformed(&translation(&Vector3::new(40.0, 0.0, 0.0)));
        assert!(clip_path_to_tab(&circle, &tab).is_empty());
    }

    #[test]
    fn points_follow_the_tab() {
        let tab = tab();
        let middle = centroid(&tab.overlap).unwrap();
        assert!(clip_point_to_tab(&middle, &tab).is_some());
        assert!(clip_point_to_tab(&tab.overlap[2], &tab).is_none());
    }
}
