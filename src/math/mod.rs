pub mod cubic;
pub mod intersect_2d;
pub mod transform;
pub mod triangle;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Tolerance for tests against the polyhedron surface: plane distance,
/// angular ordering along an arc, and "effectively at the end" parameters.
pub const EPSILON: f64 = 1e-6;

/// Maximum angle (radians) between two triangle normals of one polygon.
pub const NORMAL_TOLERANCE: f64 = 0.01;

/// Angle between two vectors in `[0, π]`, or `None` if either is zero-length.
#[must_use]
pub fn angle_between(a: &Vector3, b: &Vector3) -> Option<f64> {
    let denom = a.norm() * b.norm();
    if denom < TOLERANCE * TOLERANCE {
        return None;
    }
    Some((a.dot(b) / denom).clamp(-1.0, 1.0).acos())
}

/// Centroid of a non-empty set of points.
#[must_use]
pub fn centroid(points: &[Point3]) -> Option<Point3> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    #[allow(clippy::cast_precision_loss)]
    Some(Point3::from(sum / points.len() as f64))
}
