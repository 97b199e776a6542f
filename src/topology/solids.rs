//! Platonic solid meshes.
//!
//! Vertices come from the usual sign/cyclic permutations of a few seed
//! coordinates, sorted lexicographically. Faces are found from their normal
//! directions: the vertices furthest along a normal form that face, wound
//! counter-clockwise about it and fan-triangulated from the first vertex.

use std::cmp::Ordering;
use std::f64::consts::TAU;

use crate::math::{Point3, Vector3};

use super::mesh::{Mesh, MeshTriangle};

/// Golden ratio.
const PHI: f64 = 1.618_033_988_749_895;

/// Slack when selecting the vertices that lie on a face plane.
const FACE_SLACK: f64 = 1e-9;

/// The five regular convex polyhedra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Solid {
    Tetrahedron,
    Cube,
    Octahedron,
    Dodecahedron,
    Icosahedron,
}

impl Solid {
    /// Number of faces (polygons) of the solid.
    #[must_use]
    pub const fn face_count(self) -> usize {
        match self {
            Self::Tetrahedron => 4,
            Self::Cube => 6,
            Self::Octahedron => 8,
            Self::Dodecahedron => 12,
            Self::Icosahedron => 20,
        }
    }

    fn vertices(self) -> Vec<[f64; 3]> {
        match self {
            Self::Tetrahedron => vec![
                [1.0, 1.0, 1.0],
                [1.0, -1.0, -1.0],
                [-1.0, 1.0, -1.0],
                [-1.0, -1.0, 1.0],
            ],
            Self::Cube => sorted(signs([1.0, 1.0, 1.0])),
            Self::Octahedron => sorted(cyclic(signs([1.0, 0.0, 0.0]))),
            Self::Dodecahedron => {
                let mut points = signs([1.0, 1.0, 1.0]);
                points.extend(cyclic(signs([0.0, 1.0 / PHI, PHI])));
                sorted(points)
            }
            Self::Icosahedron => sorted(cyclic(signs([0.0, 1.0, PHI]))),
        }
    }

    fn face_normals(self) -> Vec<[f64; 3]> {
        match self {
            Self::Tetrahedron => vec![
                [-1.0, -1.0, -1.0],
                [-1.0, 1.0, 1.0],
                [1.0, -1.0, 1.0],
                [1.0, 1.0, -1.0],
            ],
            Self::Cube => sorted(cyclic(signs([1.0, 0.0, 0.0]))),
            Self::Octahedron => sorted(signs([1.0, 1.0, 1.0])),
            Self::Dodecahedron => sorted(cyclic(signs([1.0, 0.0, PHI]))),
            Self::Icosahedron => {
                let mut normals = signs([1.0, 1.0, 1.0]);
                normals.extend(cyclic(signs([1.0 / PHI, 0.0, PHI])));
                sorted(normals)
            }
        }
    }
}

fn signs([x, y, z]: [f64; 3]) -> Vec<[f64; 3]> {
    let mut out = Vec::with_capacity(8);
    for sx in [1.0, -1.0] {
        for sy in [1.0, -1.0] {
            for sz in [1.0, -1.0] {
                out.push([x * sx, y * sy, z * sz]);
            }
        }
    }
    out
}

fn cyclic(points: Vec<[f64; 3]>) -> Vec<[f64; 3]> {
    points
        .into_iter()
        .flat_map(|[x, y, z]| [[x, y, z], [y, z, x], [z, x, y]])
        .collect()
}

fn lexicographic(a: &[f64; 3], b: &[f64; 3]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Sorts and deduplicates, folding `-0.0` into `0.0` first.
fn sorted(points: Vec<[f64; 3]>) -> Vec<[f64; 3]> {
    let mut points: Vec<[f64; 3]> = points
        .into_iter()
        .map(|p| p.map(|c| c + 0.0))
        .collect();
    points.sort_by(lexicographic);
    points.dedup();
    points
}

impl Mesh {
    /// A regular solid centred on the origin with every vertex at `radius`.
    #[must_use]
    pub fn regular(solid: Solid, radius: f64) -> Self {
        let raw: Vec<Vector3> = solid
            .vertices()
            .into_iter()
            .map(|[x, y, z]| Vector3::new(x, y, z))
            .collect();

        let mut triangles = Vec::new();
        for [x, y, z] in solid.face_normals() {
            let normal = Vector3::new(x, y, z).normalize();
            let reach = raw
                .iter()
                .map(|v| v.dot(&normal))
                .fold(f64::NEG_INFINITY, f64::max);
            let mut face: Vec<usize> = (0..raw.len())
                .filter(|&i| raw[i].dot(&normal) > reach - FACE_SLACK)
                .collect();
            if face.len() < 3 {
                continue;
            }

            #[allow(clippy::cast_precision_loss)]
            let center = face.iter().map(|&i| raw[i]).sum::<Vector3>() / face.len() as f64;
            let reference = (raw[face[0]] - center).normalize();
            let side = normal.cross(&reference);
            let angle = |i: usize| {
                let d = raw[i] - center;
                d.dot(&side).atan2(d.dot(&reference)).rem_euclid(TAU)
            };
            face.sort_by(|&a, &b| angle(a).total_cmp(&angle(b)));

            for k in 1..face.len() - 1 {
                triangles.push(MeshTriangle::new([face[0], face[k], face[k + 1]], normal));
            }
        }

        let scale = raw.first().map_or(1.0, |v| radius / v.norm());
        let vertices = raw.into_iter().map(|v| Point3::from(v * scale)).collect();
        Self::new(vertices, triangles)
    }
}
