//! Data model for planar polyline graphs
//!
//! Contains the identifier type, the node/edge element types and the
//! graph itself.

pub mod components;
pub mod graph;
pub mod id;
mod mesh;

pub use components::{
    reverse_path, Edge, EdgePoint, Location, Node, OrientedEdge, SimpleEdge, SimpleNode,
};
pub use graph::Graph;
pub use id::Id;
