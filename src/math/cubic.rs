//! Closed-form intersection of a cubic bezier with a line segment.
//!
//! The segment's implicit line equation `A x + B y + C = 0` is substituted
//! into the curve's parametric polynomials, giving a cubic in `t` that is
//! solved with the trigonometric / Cardano split on the discriminant.

use std::f64::consts::PI;

use super::{Point3, TOLERANCE};

/// Slack on the `[0, 1]` parameter bounds of both the curve and the segment.
const PARAM_TOLERANCE: f64 = 1e-9;

/// Relative size below which a leading polynomial coefficient is treated as zero.
const DEGENERATE_RATIO: f64 = 1e-12;

/// A crossing between a cubic bezier and a line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierLineHit {
    /// Parameter on the curve, in `[0, 1]`.
    pub t: f64,
    /// Parameter on the segment, in `[0, 1]`.
    pub s: f64,
    /// The crossing point (z is 0).
    pub point: Point3,
}

/// Power-basis coefficients `[t³, t², t, 1]` of one axis of a cubic bezier.
#[must_use]
pub fn bezier_coefficients(p0: f64, p1: f64, p2: f64, p3: f64) -> [f64; 4] {
    [
        -p0 + 3.0 * p1 - 3.0 * p2 + p3,
        3.0 * p0 - 6.0 * p1 + 3.0 * p2,
        -3.0 * p0 + 3.0 * p1,
        p0,
    ]
}

/// Evaluates `a t³ + b t² + c t + d`.
#[must_use]
pub fn eval_cubic([a, b, c, d]: [f64; 4], t: f64) -> f64 {
    ((a * t + b) * t + c) * t + d
}

/// Real roots of `a t³ + b t² + c t + d = 0`.
///
/// Falls back to the quadratic or linear solution when the leading
/// coefficients vanish relative to the polynomial's magnitude. Complex roots
/// are dropped; a repeated real root is reported once.
#[must_use]
#[allow(clippy::many_single_char_names)]
pub fn cubic_roots(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    let scale = a.abs().max(b.abs()).max(c.abs()).max(d.abs());
    if scale < TOLERANCE * TOLERANCE {
        return Vec::new();
    }
    if a.abs() <= scale * DEGENERATE_RATIO {
        return quadratic_roots(b, c, d, scale);
    }

    let ba = b / a;
    let ca = c / a;
    let da = d / a;

    let q = (3.0 * ca - ba * ba) / 9.0;
    let r = (9.0 * ba * ca - 27.0 * da - 2.0 * ba.powi(3)) / 54.0;
    let discriminant = q.powi(3) + r * r;

    if discriminant >= 0.0 {
        let sqrt_d = discriminant.sqrt();
        let s = (r + sqrt_d).cbrt();
        let t = (r - sqrt_d).cbrt();

        let mut roots = vec![-ba / 3.0 + (s + t)];
        // A vanishing imaginary part means the complex pair collapsed into a
        // repeated real root.
        let imaginary = (3.0_f64.sqrt() * (s - t) / 2.0).abs();
        if imaginary < TOLERANCE {
            let repeated = -ba / 3.0 - (s + t) / 2.0;
            if (repeated - roots[0]).abs() > TOLERANCE {
                roots.push(repeated);
            }
        }
        roots
    } else {
        let theta = (r / (-q.powi(3)).sqrt()).clamp(-1.0, 1.0).acos();
        let m = 2.0 * (-q).sqrt();
        vec![
            m * (theta / 3.0).cos() - ba / 3.0,
            m * ((theta + 2.0 * PI) / 3.0).cos() - ba / 3.0,
            m * ((theta + 4.0 * PI) / 3.0).cos() - ba / 3.0,
        ]
    }
}

fn quadratic_roots(a: f64, b: f64, c: f64, scale: f64) -> Vec<f64> {
    if a.abs() <= scale * DEGENERATE_RATIO {
        if b.abs() <= scale * DEGENERATE_RATIO {
            return Vec::new();
        }
        return vec![-c / b];
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Vec::new();
    }
    let sqrt_d = discriminant.sqrt();
    if sqrt_d < TOLERANCE {
        return vec![-b / (2.0 * a)];
    }
    vec![(-b - sqrt_d) / (2.0 * a), (-b + sqrt_d) / (2.0 * a)]
}

/// Intersections of a cubic bezier (control points, z ignored) with the
/// segment from `start` to `end` (z ignored), sorted by curve parameter.
#[must_use]
pub fn bezier_line_intersections(
    bezier: &[Point3; 4],
    start: &Point3,
    end: &Point3,
) -> Vec<BezierLineHit> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    if dx.abs() < TOLERANCE && dy.abs() < TOLERANCE {
        return Vec::new();
    }

    // Implicit line: A x + B y + C = 0.
    let line_a = dy;
    let line_b = -dx;
    let line_c = start.x * (start.y - end.y) + start.y * (end.x - start.x);

    let cx = bezier_coefficients(bezier[0].x, bezier[1].x, bezier[2].x, bezier[3].x);
    let cy = bezier_coefficients(bezier[0].y, bezier[1].y, bezier[2].y, bezier[3].y);

    let roots = cubic_roots(
        line_a * cx[0] + line_b * cy[0],
        line_a * cx[1] + line_b * cy[1],
        line_a * cx[2] + line_b * cy[2],
        line_a * cx[3] + line_b * cy[3] + line_c,
    );

    // Measure the segment parameter along its dominant axis so near-vertical
    // lines never divide by a vanishing delta.
    let along_x = dx.abs() >= dy.abs();

    let mut hits: Vec<BezierLineHit> = roots
        .into_iter()
        .filter(|t| (-PARAM_TOLERANCE..=1.0 + PARAM_TOLERANCE).contains(t))
        .filter_map(|t| {
            let t = t.clamp(0.0, 1.0);
            let x = eval_cubic(cx, t);
            let y = eval_cubic(cy, t);
            let s = if along_x {
                (x - start.x) / dx
            } else {
                (y - start.y) / dy
            };
            (-PARAM_TOLERANCE..=1.0 + PARAM_TOLERANCE)
                .contains(&s)
                .then(|| BezierLineHit {
                    t,
                    s: s.clamp(0.0, 1.0),
                    point: Point3::new(x, y, 0.0),
                })
        })
        .collect();

    hits.sort_by(|a, b| a.t.total_cmp(&b.t));
    hits.dedup_by(|a, b| (a.t - b.t).abs() < PARAM_TOLERANCE);
    hits
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn sorted(mut roots: Vec<f64>) -> Vec<f64> {
        roots.sort_by(f64::total_cmp);
        roots
    }

    #[test]
    fn three_distinct_roots() {
        // (t - 1)(t - 2)(t - 3) = t³ - 6t² + 11t - 6
        let roots = sorted(cubic_roots(1.0, -6.0, 11.0, -6.0));
        assert_eq!(roots.len(), 3);
        for (root, expected) in roots.iter().zip([1.0, 2.0, 3.0]) {
            assert_abs_diff_eq!(*root, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn one_real_root_with_complex_pair() {
        // (t - 2)(t² + 1) = t³ - 2t² + t - 2
        let roots = cubic_roots(1.0, -2.0, 1.0, -2.0);
        assert_eq!(roots.len(), 1);
        assert_abs_diff_eq!(roots[0], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn repeated_root_reported_once() {
        // (t - 1)²(t + 2) = t³ - 3t + 2
        let roots = sorted(cubic_roots(1.0, 0.0, -3.0, 2.0));
        assert_eq!(roots.len(), 2);
        assert_abs_diff_eq!(roots[0], -2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(roots[1], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn degenerate_cubic_falls_back_to_quadratic() {
        let roots = sorted(cubic_roots(0.0, 1.0, -3.0, 2.0));
        assert_eq!(roots.len(), 2);
        assert_abs_diff_eq!(roots[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(roots[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_cubic_falls_back_to_linear() {
        let roots = cubic_roots(0.0, 0.0, 2.0, -1.0);
        assert_eq!(roots, vec![0.5]);
    }

    #[test]
    fn arch_crosses_horizontal_line_twice() {
        let arch = [p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0)];
        let hits = bezier_line_intersections(&arch, &p(-1.0, 0.5), &p(2.0, 0.5));
        assert_eq!(hits.len(), 2);
        assert!(hits[0].t < hits[1].t);
        for hit in &hits {
            assert_abs_diff_eq!(hit.point.y, 0.5, epsilon = 1e-9);
        }
        // The arch is symmetric about x = 0.5.
        assert_abs_diff_eq!(hits[0].point.x + hits[1].point.x, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn vertical_line_uses_y_for_segment_parameter() {
        // Straight curve along x from 0 to 2, crossed by x = 1.
        let straight = [p(0.0, 0.0), p(0.5, 0.0), p(1.5, 0.0), p(2.0, 0.0)];
        let hits = bezier_line_intersections(&straight, &p(1.0, -1.0), &p(1.0, 3.0));
        assert_eq!(hits.len(), 1);
        assert_abs_diff_eq!(hits[0].t, 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(hits[0].s, 0.25, epsilon = 1e-9);
    }

    #[test]
    fn crossing_outside_segment_is_rejected() {
        let arch = [p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0)];
        let hits = bezier_line_intersections(&arch, &p(2.0, 0.5), &p(3.0, 0.5));
        assert!(hits.is_empty());
    }

    #[test]
    fn zero_length_segment_has_no_hits() {
        let arch = [p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0)];
        assert!(bezier_line_intersections(&arch, &p(0.5, 0.5), &p(0.5, 0.5)).is_empty());
    }
}
