//! Euclidean geometry over locations and polylines

pub mod polyline;
pub mod primitives;

pub use polyline::{cumulative_distances, dedupe_locations, find_floor_index};
pub use primitives::{closest_point_on_segment, distance, point_along_segment, SegmentProjection};
