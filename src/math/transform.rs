use super::{angle_between, Matrix4, Point3, Vector3, TOLERANCE};

/// Builds a 4x4 rotation matrix around a unit axis by an angle (Rodrigues).
#[must_use]
#[allow(clippy::many_single_char_names)]
pub fn rotation_matrix(axis: &Vector3, angle: f64) -> Matrix4 {
    let c = angle.cos();
    let s = angle.sin();
    let t = 1.0 - c;
    let (x, y, z) = (axis.x, axis.y, axis.z);

    #[allow(clippy::suspicious_operation_groupings)]
    Matrix4::new(
        t * x * x + c,     t * x * y - s * z, t * x * z + s * y, 0.0,
        t * x * y + s * z, t * y * y + c,     t * y * z - s * x, 0.0,
        t * x * z - s * y, t * y * z + s * x, t * z * z + c,     0.0,
        0.0,               0.0,               0.0,               1.0,
    )
}

/// Rotation about the Z axis.
#[must_use]
pub fn rotation_z(angle: f64) -> Matrix4 {
    rotation_matrix(&Vector3::z(), angle)
}

/// Translation by `offset`.
#[must_use]
pub fn translation(offset: &Vector3) -> Matrix4 {
    Matrix4::new_translation(offset)
}

/// Rotation about an axis through `pivot`: `T(pivot) * R * T(-pivot)`.
#[must_use]
pub fn rotation_about(pivot: &Point3, axis: &Vector3, angle: f64) -> Matrix4 {
    translation(&pivot.coords) * rotation_matrix(axis, angle) * translation(&(-pivot.coords))
}

/// Rotation taking `normal` onto the +Z axis.
///
/// Returns the identity for a zero-length normal.
#[must_use]
pub fn align_to_z(normal: &Vector3) -> Matrix4 {
    let z = Vector3::z();
    let Some(angle) = angle_between(normal, &z) else {
        return Matrix4::identity();
    };
    let axis = normal.cross(&z);
    let len = axis.norm();
    if len < TOLERANCE {
        if normal.z >= 0.0 {
            return Matrix4::identity();
        }
        return rotation_matrix(&Vector3::x(), std::f64::consts::PI);
    }
    rotation_matrix(&(axis / len), angle)
}

/// Transforms a point by a 4x4 matrix (homogeneous coordinates).
#[must_use]
pub fn transform_point(matrix: &Matrix4, point: &Point3) -> Point3 {
    let v = matrix * nalgebra::Vector4::new(point.x, point.y, point.z, 1.0);
    Point3::new(v.x, v.y, v.z)
}

/// Transforms a direction vector by the linear part of a 4x4 matrix.
#[must_use]
pub fn transform_direction(matrix: &Matrix4, dir: &Vector3) -> Vector3 {
    let v = matrix * nalgebra::Vector4::new(dir.x, dir.y, dir.z, 0.0);
    Vector3::new(v.x, v.y, v.z)
}
