//! Graph elements - nodes, polyline edges and points on edges

use geo::{Coord, LineString};

use crate::geometry::{cumulative_distances, dedupe_locations, find_floor_index, point_along_segment};

use super::Id;

/// A 2-D Cartesian location. Equality is plain float equality.
pub type Location = Coord<f64>;

/// Node as supplied to [`Graph::create`](crate::Graph::create).
#[derive(Debug, Clone)]
pub struct SimpleNode {
    pub id: Id,
    pub location: Location,
}

impl SimpleNode {
    pub fn new(id: impl Into<Id>, location: Location) -> Self {
        Self {
            id: id.into(),
            location,
        }
    }
}

/// Edge as supplied to [`Graph::create`](crate::Graph::create).
///
/// The polyline of the edge runs from the start node through the inner
/// locations to the end node. `start_node_id == end_node_id` is permitted
/// and forms a self-loop.
#[derive(Debug, Clone)]
pub struct SimpleEdge {
    pub id: Id,
    pub start_node_id: Id,
    pub end_node_id: Id,
    pub inner_locations: Vec<Location>,
}

impl SimpleEdge {
    /// A straight edge with no inner locations.
    pub fn new(id: impl Into<Id>, start_node_id: impl Into<Id>, end_node_id: impl Into<Id>) -> Self {
        Self::with_geometry(id, start_node_id, end_node_id, Vec::new())
    }

    pub fn with_geometry(
        id: impl Into<Id>,
        start_node_id: impl Into<Id>,
        end_node_id: impl Into<Id>,
        inner_locations: Vec<Location>,
    ) -> Self {
        Self {
            id: id.into(),
            start_node_id: start_node_id.into(),
            end_node_id: end_node_id.into(),
            inner_locations,
        }
    }
}

/// Node owned by a graph.
///
/// `edge_ids` lists incident edges in the construction order of the edge
/// input; a self-loop appears twice.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: Id,
    pub location: Location,
    pub edge_ids: Vec<Id>,
}

impl Node {
    /// Number of edge incidences (a self-loop counts twice).
    pub fn degree(&self) -> usize {
        self.edge_ids.len()
    }
}

/// Edge owned by a graph, with its derived polyline tables.
#[derive(Debug, Clone)]
pub struct Edge {
    pub id: Id,
    pub start_node_id: Id,
    pub end_node_id: Id,
    pub inner_locations: Vec<Location>,
    /// Full polyline: start location, inner locations, end location.
    pub locations: Vec<Location>,
    /// Cumulative distance along `locations`; starts at 0, ends at `length`.
    pub location_distances: Vec<f64>,
    /// Total polyline length.
    pub length: f64,
}

impl Edge {
    pub(crate) fn derive(
        simple: SimpleEdge,
        start_location: Location,
        end_location: Location,
    ) -> Self {
        let mut locations = Vec::with_capacity(simple.inner_locations.len() + 2);
        locations.push(start_location);
        locations.extend_from_slice(&simple.inner_locations);
        locations.push(end_location);
        let location_distances = cumulative_distances(&locations);
        let length = location_distances.last().copied().unwrap_or(0.0);
        Self {
            id: simple.id,
            start_node_id: simple.start_node_id,
            end_node_id: simple.end_node_id,
            inner_locations: simple.inner_locations,
            locations,
            location_distances,
            length,
        }
    }

    pub fn is_loop(&self) -> bool {
        self.start_node_id == self.end_node_id
    }

    /// Location at `distance` from the start node along the polyline.
    ///
    /// Distances below 0 resolve to the start location and distances at or
    /// past `length` resolve to the end location, so the stored endpoint
    /// coordinates are returned exactly even when float accumulation makes
    /// `length` land short of the last interpolation step.
    pub fn location_at(&self, distance: f64) -> Location {
        if distance < 0.0 {
            return self.locations[0];
        }
        if distance >= self.length {
            return self.locations[self.locations.len() - 1];
        }
        let index = find_floor_index(&self.location_distances, distance).unwrap_or(0);
        point_along_segment(
            self.locations[index],
            self.locations[index + 1],
            distance - self.location_distances[index],
        )
    }

    /// Sub-polyline from distance `from` to distance `to`, in that
    /// directional order. Equal distances yield a single location.
    pub fn locations_on_interval(&self, from: f64, to: f64) -> Vec<Location> {
        if from == to {
            return vec![self.location_at(from)];
        }
        let (low, high) = if from < to { (from, to) } else { (to, from) };
        let index_low = find_floor_index(&self.location_distances, low).unwrap_or(0);
        let index_high = find_floor_index(&self.location_distances, high).unwrap_or(0);
        let mut interior = self.locations[index_low + 1..index_high + 1].to_vec();
        if to < from {
            interior.reverse();
        }
        let mut result = Vec::with_capacity(interior.len() + 2);
        result.push(self.location_at(from));
        result.extend(interior);
        result.push(self.location_at(to));
        dedupe_locations(result)
    }

    /// The polyline as a `geo` line string.
    pub fn line_string(&self) -> LineString<f64> {
        LineString::from(self.locations.clone())
    }
}

/// A point on an edge, parameterized by distance from its start node.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePoint {
    pub edge_id: Id,
    pub distance: f64,
}

impl EdgePoint {
    pub fn new(edge_id: impl Into<Id>, distance: f64) -> Self {
        Self {
            edge_id: edge_id.into(),
            distance,
        }
    }
}

/// An edge together with a traversal direction (forward = start to end).
#[derive(Debug, Clone, Copy)]
pub struct OrientedEdge<'g> {
    pub edge: &'g Edge,
    pub is_forward: bool,
}

impl<'g> OrientedEdge<'g> {
    /// The node this oriented edge is traversed from.
    pub fn start_node_id(&self) -> &'g Id {
        if self.is_forward {
            &self.edge.start_node_id
        } else {
            &self.edge.end_node_id
        }
    }

    /// The node this oriented edge is traversed towards.
    pub fn end_node_id(&self) -> &'g Id {
        if self.is_forward {
            &self.edge.end_node_id
        } else {
            &self.edge.start_node_id
        }
    }

    pub fn reversed(self) -> Self {
        Self {
            edge: self.edge,
            is_forward: !self.is_forward,
        }
    }
}

/// Reverses a traversal: the sequence is reversed and every edge flips
/// its direction.
pub fn reverse_path<'g>(oriented_edges: &[OrientedEdge<'g>]) -> Vec<OrientedEdge<'g>> {
    oriented_edges
        .iter()
        .rev()
        .map(|oriented| oriented.reversed())
        .collect()
}
