use crate::error::{Result, TopologyError};
use crate::math::{Point3, Vector3, TOLERANCE};

/// A mesh triangle: three vertex indices and a precomputed face normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshTriangle {
    pub indices: [usize; 3],
    pub normal: Vector3,
}

impl MeshTriangle {
    #[must_use]
    pub fn new(indices: [usize; 3], normal: Vector3) -> Self {
        Self { indices, normal }
    }
}

/// Raw triangle soup with shared vertices, the input to
/// [`Topology::new`](super::Topology::new).
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Point3>,
    pub triangles: Vec<MeshTriangle>,
}

impl Mesh {
    #[must_use]
    pub fn new(vertices: Vec<Point3>, triangles: Vec<MeshTriangle>) -> Self {
        Self {
            vertices,
            triangles,
        }
    }

    /// Builds a mesh from counter-clockwise index triples, deriving each
    /// normal from the winding.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidMesh`] if an index is out of range or
    /// a triangle is degenerate.
    pub fn from_indices(vertices: Vec<Point3>, indices: &[[usize; 3]]) -> Result<Self> {
        let triangles = indices
            .iter()
            .map(|&[a, b, c]| {
                let (Some(pa), Some(pb), Some(pc)) =
                    (vertices.get(a), vertices.get(b), vertices.get(c))
                else {
                    return Err(TopologyError::InvalidMesh(format!(
                        "triangle [{a}, {b}, {c}] references a missing vertex"
                    ))
                    .into());
                };
                let normal = (pb - pa).cross(&(pc - pa));
                let len = normal.norm();
                if len < TOLERANCE {
                    return Err(TopologyError::InvalidMesh(format!(
                        "triangle [{a}, {b}, {c}] is degenerate"
                    ))
                    .into());
                }
                Ok(MeshTriangle::new([a, b, c], normal / len))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(vertices, triangles))
    }

    /// Checks that the mesh is non-empty, every index is in range and every
    /// normal is non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidMesh`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.triangles.is_empty() {
            return Err(TopologyError::InvalidMesh("mesh has no triangles".into()).into());
        }
        for (i, tri) in self.triangles.iter().enumerate() {
            if let Some(index) = tri.indices.iter().find(|&&v| v >= self.vertices.len()) {
                return Err(TopologyError::InvalidMesh(format!(
                    "triangle {i} references vertex {index} of {}",
                    self.vertices.len()
                ))
                .into());
            }
            if tri.normal.norm() < TOLERANCE {
                return Err(
                    TopologyError::InvalidMesh(format!("triangle {i} has a zero normal")).into(),
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn square() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn normals_follow_winding() {
        let mesh = Mesh::from_indices(square(), &[[0, 1, 2], [0, 2, 3]]).unwrap();
        for tri in &mesh.triangles {
            assert_abs_diff_eq!(tri.normal, Vector3::z(), epsilon = 1e-12);
        }
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn missing_vertex_is_rejected() {
        assert!(Mesh::from_indices(square(), &[[0, 1, 7]]).is_err());
    }

    #[test]
    fn degenerate_triangle_is_rejected() {
        assert!(Mesh::from_indices(square(), &[[0, 1, 1]]).is_err());
    }

    #[test]
    fn empty_mesh_is_invalid() {
        assert!(Mesh::default().validate().is_err());
    }
}
