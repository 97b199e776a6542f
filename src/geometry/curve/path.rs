use crate::math::{Matrix4, Point3, EPSILON};

use super::CubicBezier;

/// An ordered sequence of cubic bezier curves.
///
/// Consecutive curves are usually joined end to start, but a path may hold
/// several disconnected runs (see [`CurvePath::split_continuous`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurvePath {
    curves: Vec<CubicBezier>,
}

impl CurvePath {
    /// Creates an empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_curves(curves: Vec<CubicBezier>) -> Self {
        Self { curves }
    }

    pub fn push(&mut self, curve: CubicBezier) {
        self.curves.push(curve);
    }

    /// Returns the curves in path order.
    #[must_use]
    pub fn curves(&self) -> &[CubicBezier] {
        &self.curves
    }

    /// Returns the number of curves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Start point of the first curve.
    #[must_use]
    pub fn start(&self) -> Option<Point3> {
        self.curves.first().map(CubicBezier::start)
    }

    /// End point of the last curve.
    #[must_use]
    pub fn end(&self) -> Option<Point3> {
        self.curves.last().map(CubicBezier::end)
    }

    /// Returns the path with every curve transformed by `matrix`.
    #[must_use]
    pub fn transformed(&self, matrix: &Matrix4) -> Self {
        Self {
            curves: self.curves.iter().map(|c| c.transformed(matrix)).collect(),
        }
    }

    /// All control points, four per curve.
    #[must_use]
    pub fn control_points(&self) -> Vec<Point3> {
        self.curves
            .iter()
            .flat_map(|c| c.control_points().iter().copied())
            .collect()
    }

    /// Samples every curve at `divisions` equal parameter steps.
    ///
    /// Shared end points of continuous curves are emitted once.
    #[must_use]
    pub fn to_polyline(&self, divisions: usize) -> Vec<Point3> {
        let divisions = divisions.max(1);
        let mut points: Vec<Point3> = Vec::with_capacity(self.curves.len() * divisions + 1);
        for curve in &self.curves {
            let skip_first = points
                .last()
                .is_some_and(|last| (last - curve.start()).norm() < EPSILON);
            let first = usize::from(skip_first);
            #[allow(clippy::cast_precision_loss)]
            points.extend((first..=divisions).map(|i| curve.point_at(i as f64 / divisions as f64)));
        }
        points
    }

    /// Splits the path into runs whose curves join end to start within
    /// [`EPSILON`].
    #[must_use]
    pub fn split_continuous(&self) -> Vec<CurvePath> {
        let mut runs: Vec<CurvePath> = Vec::new();
        for curve in &self.curves {
            let joins = |run: &CurvePath| {
                run.end()
                    .is_some_and(|end| (end - curve.start()).norm() < EPSILON)
            };
            match runs.last_mut() {
                Some(run) if joins(&*run) => run.push(*curve),
                _ => runs.push(CurvePath::from_curves(vec![*curve])),
            }
        }
        runs
    }
}

impl From<Vec<CubicBezier>> for CurvePath {
    fn from(curves: Vec<CubicBezier>) -> Self {
        Self::from_curves(curves)
    }
}

impl FromIterator<CubicBezier> for CurvePath {
    fn from_iter<I: IntoIterator<Item = CubicBezier>>(iter: I) -> Self {
        Self::from_curves(iter.into_iter().collect())
    }
}
