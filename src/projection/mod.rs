//! Projection of directions, great-circle lines and small curve patches onto
//! the polyhedron surface.
//!
//! Every result is tagged with the polygon it lies on; content that crosses
//! a polygon boundary comes back as an ordered list of pieces whose end
//! points meet on the shared edges.

mod curve;
mod line;
mod sky;
mod vector;

pub use curve::{ProjectCurvePath, ProjectCurves};
pub use line::ProjectLineSegment;
pub use sky::{Asterism, ProjectSky, ProjectedAsterism, ProjectedSky, ProjectedStar, Star};
pub use vector::ProjectVector;

use crate::geometry::{CubicBezier, CurvePath, Segment};
use crate::math::transform::rotation_matrix;
use crate::math::{Matrix4, Point3, Vector3};
use crate::topology::PolygonId;

/// A point on the surface and the polygon it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub polygon: PolygonId,
    pub point: Point3,
}

/// A straight piece of a projected line, lying on one polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedSegment {
    pub polygon: PolygonId,
    pub segment: Segment,
}

/// A piece of a projected curve, lying on one polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedCurve {
    pub polygon: PolygonId,
    pub curve: CubicBezier,
}

/// All pieces of a projected path that landed on one polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedPath {
    pub polygon: PolygonId,
    pub path: CurvePath,
}

/// Unit direction for a right ascension / declination pair (radians).
///
/// `x = cos(dec)·sin(ra)`, `y = sin(dec)`, `z = cos(dec)·cos(ra)`.
#[must_use]
pub fn direction_from_angles(right_ascension: f64, declination: f64) -> Vector3 {
    let (sin_dec, cos_dec) = declination.sin_cos();
    let (sin_ra, cos_ra) = right_ascension.sin_cos();
    Vector3::new(cos_dec * sin_ra, sin_dec, cos_dec * cos_ra)
}

/// Rotation taking the local +Z axis of a curve patch onto `direction`.
///
/// Built as `Ry(π/2 − ra) · Rx(−dec)` with `ra = atan2(z, x)` and
/// `dec = asin(y)` of the normalized direction.
#[must_use]
pub fn patch_rotation(direction: &Vector3) -> Matrix4 {
    let d = direction.try_normalize(0.0).unwrap_or_else(Vector3::z);
    let ra = d.z.atan2(d.x);
    let dec = d.y.clamp(-1.0, 1.0).asin();
    rotation_matrix(&Vector3::y(), std::f64::consts::FRAC_PI_2 - ra)
        * rotation_matrix(&Vector3::x(), -dec)
}
