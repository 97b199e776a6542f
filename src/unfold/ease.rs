//! Easing curves for the fold animation parameter.

use std::f64::consts::PI;

/// Identity easing.
#[must_use]
pub fn linear(t: f64) -> f64 {
    t
}

/// Slow start and end, fastest at `t = 0.5`.
#[must_use]
pub fn sine_in_out(t: f64) -> f64 {
    -((PI * t).cos() - 1.0) / 2.0
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn end_points_are_fixed() {
        for ease in [linear, sine_in_out] {
            assert_abs_diff_eq!(ease(0.0), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(ease(1.0), 1.0, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(sine_in_out(0.5), 0.5, epsilon = 1e-12);
        assert!(sine_in_out(0.1) < 0.1);
    }
}
