//! Small outline shapes drawn in a local XY patch and projected onto the
//! polyhedron as star markers.

use std::f64::consts::{FRAC_PI_2, TAU};

use crate::math::Point3;

use super::curve::{CubicBezier, CurvePath};

/// Control point offset for a quarter circle (Mortensen's approximation).
const CIRCLE_CONTROL: f64 = 0.551_915_024_494;

fn polar(radius: f64, angle: f64) -> Point3 {
    Point3::new(radius * angle.cos(), radius * angle.sin(), 0.0)
}

/// A closed star of `points` tips at `radius`, one curve per tip-to-tip arc
/// pulled in towards `inner_radius` (half of `radius` when `None`).
#[must_use]
pub fn bezier_star(points: usize, radius: f64, inner_radius: Option<f64>) -> CurvePath {
    if points == 0 {
        return CurvePath::new();
    }
    let inner = inner_radius.unwrap_or(radius * 0.5);

    #[allow(clippy::cast_precision_loss)]
    let n = points as f64;
    let base = -FRAC_PI_2;
    let arc = TAU / n;
    let half = arc / 2.0;
    let step = arc / n;

    (0..points)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let start = base + i as f64 * arc + half;
            CubicBezier::new(
                polar(radius, start),
                polar(inner, start + step),
                polar(inner, start + 2.0 * step),
                polar(radius, start + arc),
            )
        })
        .collect()
}

/// Four-arc circle of the given radius, clockwise from +Y.
#[must_use]
pub fn bezier_circle(radius: f64) -> CurvePath {
    let c = CIRCLE_CONTROL;
    let arcs = [
        [(0.0, 1.0), (c, 1.0), (1.0, c), (1.0, 0.0)],
        [(1.0, 0.0), (1.0, -c), (c, -1.0), (0.0, -1.0)],
        [(0.0, -1.0), (-c, -1.0), (-1.0, -c), (-1.0, 0.0)],
        [(-1.0, 0.0), (-1.0, c), (-c, 1.0), (0.0, 1.0)],
    ];
    arcs.iter()
        .map(|arc| {
            let [a, b, c, d] = arc.map(|(x, y)| Point3::new(x * radius, y * radius, 0.0));
            CubicBezier::new(a, b, c, d)
        })
        .collect()
}
