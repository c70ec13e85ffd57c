//! Convenience re-exports for callers of the crate

pub use crate::error::Error;
pub use crate::geometry::distance;
pub use crate::model::{
    reverse_path, Edge, EdgePoint, Graph, Id, Location, Node, OrientedEdge, SimpleEdge, SimpleNode,
};
pub use crate::routing::{advance_along_locations, advance_along_path, Path};
