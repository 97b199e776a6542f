mod bezier;
mod path;
mod segment;

pub use bezier::CubicBezier;
pub use path::CurvePath;
pub use segment::Segment;
