//! Project star maps onto convex polyhedra and unfold them into paper nets.
//!
//! The pipeline runs [`topology::Topology`] → [`projection`] of stars and
//! asterisms → [`unfold`] along a net → [`template`] layout with glue tabs.

pub mod error;
pub mod geometry;
pub mod math;
pub mod params;
pub mod projection;
pub mod template;
pub mod topology;
pub mod unfold;

pub use error::{Result, StarfoldError};
