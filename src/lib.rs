//! Geometric and topological queries over immutable planar polyline graphs
//!
//! A [`Graph`] is built once from node and edge inputs and never mutated.
//! Nodes carry 2-D Cartesian locations; edges are polylines running from
//! their start node through optional inner locations to their end node,
//! and points on them are addressed by distance from the start
//! ([`EdgePoint`]). On top of that model the crate answers:
//!
//! - [`Graph::get_location`]: resolve an edge point to coordinates;
//! - [`Graph::get_closest_point`]: nearest edge point to an arbitrary
//!   location, backed by an R-tree sample mesh
//!   ([`Graph::with_closest_point_mesh`]);
//! - [`Graph::get_shortest_path`]: shortest path between two edge points
//!   with the full polyline trace;
//! - [`Graph::coalesced`]: collapse degree-2 chains into single polyline
//!   edges;
//! - [`advance_along_path`] / [`advance_along_locations`]: move a
//!   computed path forward by a distance.
//!
//! ```
//! use geo::Coord;
//! use polyroute::{EdgePoint, Graph, SimpleEdge, SimpleNode};
//!
//! let graph = Graph::create(
//!     vec![
//!         SimpleNode::new("a", Coord { x: 0.0, y: 0.0 }),
//!         SimpleNode::new("b", Coord { x: 2.0, y: 0.0 }),
//!     ],
//!     vec![SimpleEdge::new("ab", "a", "b")],
//! )?;
//! let location = graph.get_location(&EdgePoint::new("ab", 0.5))?;
//! assert_eq!(location, Coord { x: 0.5, y: 0.0 });
//! # Ok::<(), polyroute::Error>(())
//! ```

mod algo;
pub mod error;
pub mod geometry;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;
pub use geometry::distance;
pub use model::{
    Edge, EdgePoint, Graph, Id, Location, Node, OrientedEdge, SimpleEdge, SimpleNode,
};
pub use routing::{advance_along_locations, advance_along_path, Path};
