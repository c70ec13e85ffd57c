//! Shortest paths between edge points and operations on computed paths

mod advance;
mod astar;
mod path;
mod to_geojson;

pub use advance::{advance_along_locations, advance_along_path};
pub use path::Path;

pub(crate) use astar::shortest_path;
