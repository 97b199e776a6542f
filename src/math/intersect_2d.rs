use super::{Point3, Vector3, TOLERANCE};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point3,
    d1: &Vector3,
    p2: &Point3,
    d2: &Vector3,
) -> Option<(f64, f64)> {
    let cross = d1.x * d2.y - d1.y * d2.x;
    if cross.abs() < TOLERANCE {
        return None;
    }
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let t = (dx * d2.y - dy * d2.x) / cross;
    let u = (dx * d1.y - dy * d1.x) / cross;
    Some((t, u))
}

/// Crossing of segments `a0 → a1` and `b0 → b1` in the XY plane, as
/// `(point, t, u)` with both parameters clamped to `[0, 1]`. End points
/// count. The point takes its z from `a0`.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point3,
    a1: &Point3,
    b0: &Point3,
    b1: &Point3,
) -> Option<(Point3, f64, f64)> {
    let da = Vector3::new(a1.x - a0.x, a1.y - a0.y, 0.0);
    let db = Vector3::new(b1.x - b0.x, b1.y - b0.y, 0.0);

    let (t, u) = line_line_intersect_2d(a0, &da, b0, &db)?;

    let bounds = -TOLERANCE..=1.0 + TOLERANCE;
    if !bounds.contains(&t) || !bounds.contains(&u) {
        return None;
    }
    let t = t.clamp(0.0, 1.0);
    Some((Point3::new(a0.x + da.x * t, a0.y + da.y * t, a0.z), t, u.clamp(0.0, 1.0)))
}

/// Parameters along segment `a0 → a1` where it crosses any of `boundary`'s
/// segments, sorted and deduplicated. Endpoint crossings (`0` and `1`) are
/// dropped since they do not split the segment.
#[must_use]
pub fn segment_crossings_2d(a0: &Point3, a1: &Point3, boundary: &[(Point3, Point3)]) -> Vec<f64> {
    let mut crossings: Vec<f64> = boundary
        .iter()
        .filter_map(|(b0, b1)| segment_segment_intersect_2d(a0, a1, b0, b1))
        .map(|(_, t, _)| t)
        .filter(|t| *t > TOLERANCE && *t < 1.0 - TOLERANCE)
        .collect();
    crossings.sort_by(f64::total_cmp);
    crossings.dedup_by(|a, b| (*a - *b).abs() < TOLERANCE);
    crossings
}
