use thiserror::Error;

use crate::topology::{EdgeId, EdgeKey, PolygonId};

/// Top-level error type for starfold.
#[derive(Debug, Error)]
pub enum StarfoldError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Unfold(#[from] UnfoldError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors raised while building a [`Topology`](crate::topology::Topology).
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("edge {key} is shared by {count} polygon edges, expected 2")]
    NonManifoldTopology { key: EdgeKey, count: usize },
}

/// Errors raised while projecting onto a topology.
#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("ray does not intersect any polygon")]
    NoIntersection,

    #[error("point does not lie on the polyhedron surface")]
    PointNotOnSurface,

    #[error("no boundary crossings found between polygon {from} and polygon {to}")]
    NoPath { from: PolygonId, to: PolygonId },

    #[error("curve projection did not settle after {0} splits")]
    CurveDidNotConverge(usize),
}

/// Errors raised while following a net descriptor.
#[derive(Debug, Error)]
pub enum UnfoldError {
    #[error("edge reference {index} is out of range for polygon {polygon} with {len} edges")]
    EdgeOutOfRange {
        polygon: PolygonId,
        index: isize,
        len: usize,
    },

    #[error("net revisits polygon {0}")]
    PolygonRevisited(PolygonId),

    #[error("net reaches {visited} of {total} polygons")]
    IncompleteNet { visited: usize, total: usize },

    #[error("root edge {0} does not exist")]
    UnknownEdge(EdgeId),
}

/// Convenience type alias for results using [`StarfoldError`].
pub type Result<T> = std::result::Result<T, StarfoldError>;
