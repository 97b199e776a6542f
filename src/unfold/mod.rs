//! Unfolding a topology into a flat net.

pub mod ease;
mod net;
mod tree;

pub use net::{EdgeRef, NetDescriptor, NetStep};
pub use tree::{BuildUnfoldTree, NodeId, UnfoldNode, UnfoldTree};
