//! Validated graph construction and edge-parameterized accessors

use hashbrown::HashMap;
use log::{debug, warn};
use petgraph::graph::{NodeIndex, UnGraph};

use crate::algo;
use crate::error::Error;
use crate::geometry::closest_point_on_segment;
use crate::routing::{self, Path};

use super::mesh::ClosestPointMesh;
use super::{Edge, EdgePoint, Id, Location, Node, SimpleEdge, SimpleNode};

/// An immutable planar graph whose vertices carry locations and whose
/// edges are polylines.
///
/// A graph is created once by [`Graph::create`] and never mutated; derived
/// operations such as [`Graph::coalesced`] or
/// [`Graph::with_closest_point_mesh`] return fresh instances. Nodes and
/// edges iterate in the construction order of their inputs.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    node_positions: HashMap<Id, usize>,
    edge_positions: HashMap<Id, usize>,
    /// Start and end node positions per edge, parallel to `edges`.
    pub(crate) edge_endpoints: Vec<(usize, usize)>,
    /// Adjacency backbone; node index `i` is `nodes[i]`, edge weights are
    /// positions into `edges`.
    pub(crate) adjacency: UnGraph<(), usize>,
    mesh: Option<ClosestPointMesh>,
}

impl Graph {
    /// Builds a graph from node and edge inputs.
    ///
    /// Fails when a node or edge id repeats, or when an edge references a
    /// node id that is not in the node list.
    pub fn create(nodes: Vec<SimpleNode>, edges: Vec<SimpleEdge>) -> Result<Self, Error> {
        let mut node_positions = HashMap::with_capacity(nodes.len());
        let mut built_nodes = Vec::with_capacity(nodes.len());
        let mut adjacency = UnGraph::with_capacity(nodes.len(), edges.len());
        for simple in nodes {
            if node_positions.contains_key(&simple.id) {
                return Err(Error::DuplicateNodeId(simple.id));
            }
            node_positions.insert(simple.id.clone(), built_nodes.len());
            adjacency.add_node(());
            built_nodes.push(Node {
                id: simple.id,
                location: simple.location,
                edge_ids: Vec::new(),
            });
        }

        let mut edge_positions = HashMap::with_capacity(edges.len());
        let mut edge_endpoints = Vec::with_capacity(edges.len());
        let mut built_edges = Vec::with_capacity(edges.len());
        for simple in edges {
            if edge_positions.contains_key(&simple.id) {
                return Err(Error::DuplicateEdgeId(simple.id));
            }
            let start = Self::referenced_position(&node_positions, &simple, &simple.start_node_id)?;
            let end = Self::referenced_position(&node_positions, &simple, &simple.end_node_id)?;
            built_nodes[start].edge_ids.push(simple.id.clone());
            built_nodes[end].edge_ids.push(simple.id.clone());
            adjacency.add_edge(
                NodeIndex::new(start),
                NodeIndex::new(end),
                built_edges.len(),
            );
            edge_positions.insert(simple.id.clone(), built_edges.len());
            edge_endpoints.push((start, end));
            let start_location = built_nodes[start].location;
            let end_location = built_nodes[end].location;
            built_edges.push(Edge::derive(simple, start_location, end_location));
        }

        debug!(
            "constructed graph with {} nodes and {} edges",
            built_nodes.len(),
            built_edges.len()
        );
        Ok(Self {
            nodes: built_nodes,
            edges: built_edges,
            node_positions,
            edge_positions,
            edge_endpoints,
            adjacency,
            mesh: None,
        })
    }

    fn referenced_position(
        node_positions: &HashMap<Id, usize>,
        edge: &SimpleEdge,
        node_id: &Id,
    ) -> Result<usize, Error> {
        node_positions
            .get(node_id)
            .copied()
            .ok_or_else(|| Error::UnknownReferencedNode {
                edge_id: edge.id.clone(),
                node_id: node_id.clone(),
            })
    }

    /// All nodes in construction order.
    pub fn get_all_nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges in construction order.
    pub fn get_all_edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Looks up a node; absent ids are not an error.
    pub fn get_node(&self, id: &Id) -> Option<&Node> {
        self.node_positions.get(id).map(|&pos| &self.nodes[pos])
    }

    /// Looks up an edge; absent ids are not an error.
    pub fn get_edge(&self, id: &Id) -> Option<&Edge> {
        self.edge_positions.get(id).map(|&pos| &self.edges[pos])
    }

    /// The edges incident to a node, in the order they were added during
    /// construction.
    pub fn get_edges_of_node(&self, id: &Id) -> Result<Vec<&Edge>, Error> {
        let node = self
            .get_node(id)
            .ok_or_else(|| Error::UnknownNodeId(id.clone()))?;
        Ok(node
            .edge_ids
            .iter()
            .filter_map(|edge_id| self.get_edge(edge_id))
            .collect())
    }

    /// The start and end nodes of an edge.
    pub fn get_endpoints_of_edge(&self, id: &Id) -> Result<(&Node, &Node), Error> {
        let edge = self
            .get_edge(id)
            .ok_or_else(|| Error::UnknownEdgeId(id.clone()))?;
        let start = self
            .get_node(&edge.start_node_id)
            .ok_or_else(|| Error::UnknownNodeId(edge.start_node_id.clone()))?;
        let end = self
            .get_node(&edge.end_node_id)
            .ok_or_else(|| Error::UnknownNodeId(edge.end_node_id.clone()))?;
        Ok((start, end))
    }

    /// The endpoint of `edge_id` opposite to `node_id`; for a self-loop
    /// this is the sole endpoint.
    pub fn get_other_endpoint(&self, edge_id: &Id, node_id: &Id) -> Result<&Node, Error> {
        let edge = self
            .get_edge(edge_id)
            .ok_or_else(|| Error::UnknownEdgeId(edge_id.clone()))?;
        let other_id = if edge.start_node_id == *node_id {
            &edge.end_node_id
        } else if edge.end_node_id == *node_id {
            &edge.start_node_id
        } else {
            return Err(Error::NotAnEndpoint {
                edge_id: edge_id.clone(),
                node_id: node_id.clone(),
            });
        };
        self.get_node(other_id)
            .ok_or_else(|| Error::UnknownNodeId(other_id.clone()))
    }

    /// The far endpoint of every incident edge, one entry per incidence.
    pub fn get_neighbors(&self, node_id: &Id) -> Result<Vec<&Node>, Error> {
        let node = self
            .get_node(node_id)
            .ok_or_else(|| Error::UnknownNodeId(node_id.clone()))?;
        node.edge_ids
            .iter()
            .map(|edge_id| self.get_other_endpoint(edge_id, node_id))
            .collect()
    }

    /// Resolves an edge point to Cartesian coordinates.
    ///
    /// Out-of-range distances clamp to the nearest endpoint location.
    pub fn get_location(&self, point: &EdgePoint) -> Result<Location, Error> {
        let edge = self
            .get_edge(&point.edge_id)
            .ok_or_else(|| Error::UnknownEdgeId(point.edge_id.clone()))?;
        Ok(edge.location_at(point.distance))
    }

    /// Collapses maximal degree-2 chains into single polyline edges; an
    /// isolated simple cycle becomes one node with a self-loop.
    pub fn coalesced(&self) -> Result<Graph, Error> {
        algo::coalesce(self)
    }

    /// Connected components, in order of first node occurrence. Each
    /// component preserves this graph's insertion order.
    pub fn get_connected_components(&self) -> Result<Vec<Graph>, Error> {
        algo::connected_components(self)
    }

    /// The connected component containing `id`.
    pub fn get_connected_component_of_node(&self, id: &Id) -> Result<Graph, Error> {
        algo::connected_component_of_node(self, id)
    }

    /// Shortest path between two edge points, with its full polyline trace.
    pub fn get_shortest_path(&self, start: &EdgePoint, end: &EdgePoint) -> Result<Path<'_>, Error> {
        routing::shortest_path(self, start, end)
    }

    /// A copy of this graph carrying a closest-point sample mesh with the
    /// given spacing. An existing mesh is replaced.
    pub fn with_closest_point_mesh(&self, precision: f64) -> Graph {
        let mut graph = self.clone();
        graph.mesh = Some(ClosestPointMesh::build(self, precision));
        graph
    }

    pub fn has_closest_point_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    /// The edge point closest to `location`.
    ///
    /// With a mesh this is a nearest-neighbor lookup refined to the exact
    /// closest point on the hit segment. Without one it degrades to a scan
    /// of every segment of every edge.
    pub fn get_closest_point(&self, location: Location) -> Result<EdgePoint, Error> {
        if let Some(mesh) = &self.mesh {
            return mesh.nearest(self, location).ok_or(Error::EmptyGraph);
        }
        warn!(
            "closest-point query without a mesh scans all {} edges; \
             build one with with_closest_point_mesh",
            self.edges.len()
        );
        let mut best: Option<(f64, EdgePoint)> = None;
        for edge in &self.edges {
            for (index, window) in edge.locations.windows(2).enumerate() {
                let projection = closest_point_on_segment(location, window[0], window[1]);
                let better = best
                    .as_ref()
                    .map(|(distance, _)| projection.distance_from_location < *distance)
                    .unwrap_or(true);
                if better {
                    best = Some((
                        projection.distance_from_location,
                        EdgePoint {
                            edge_id: edge.id.clone(),
                            distance: edge.location_distances[index]
                                + projection.distance_down_segment,
                        },
                    ));
                }
            }
        }
        best.map(|(_, point)| point).ok_or(Error::EmptyGraph)
    }

    pub(crate) fn node_position(&self, id: &Id) -> Option<usize> {
        self.node_positions.get(id).copied()
    }

    /// Positions of the edges incident to the node at `node_position`.
    pub(crate) fn incident_edge_positions(
        &self,
        node_position: usize,
    ) -> impl Iterator<Item = usize> + '_ {
        self.adjacency
            .edges(NodeIndex::new(node_position))
            .map(|edge_ref| *edge_ref.weight())
    }

    pub(crate) fn edge_position(&self, id: &Id) -> Option<usize> {
        self.edge_positions.get(id).copied()
    }
}
