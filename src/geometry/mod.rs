pub mod curve;
pub mod plane;
pub mod ray;
pub mod shapes;

pub use curve::{CubicBezier, CurvePath, Segment};
pub use plane::Plane;
pub use ray::Ray;
