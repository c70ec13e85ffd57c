//! Modified A* between points inside edges
//!
//! Source and target are edge points rather than vertices. The search
//! seeds both endpoints of the start edge with their partial leg lengths,
//! runs A* towards a synthetic goal vertex that sits behind the residual
//! leg of the end edge, and reconstructs the traversal afterwards.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;

use crate::error::Error;
use crate::geometry::distance;
use crate::model::{EdgePoint, Graph, Location};

use super::path::{self, Path};

/// Heap entry. `node == None` is the synthetic goal vertex, reached only
/// through the end edge point.
#[derive(Debug, Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node: Option<usize>,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Flipped comparison: BinaryHeap is a max-heap.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Mutable search scratch, live for a single query.
struct Search {
    distances: HashMap<usize, f64>,
    came_from: HashMap<usize, usize>,
    done: FixedBitSet,
    heap: BinaryHeap<State>,
    best_end_distance: f64,
    end_edge_forward: bool,
    end_location: Location,
}

impl Search {
    fn seed(&mut self, graph: &Graph, node: usize, from_start: f64) {
        if from_start < self.distances.get(&node).copied().unwrap_or(f64::INFINITY) {
            self.distances.insert(node, from_start);
            self.heap.push(State {
                cost: from_start + distance(graph.nodes[node].location, self.end_location),
                node: Some(node),
            });
        }
    }

    /// Records a candidate total cost through the end edge; `forward` is
    /// true when the matched vertex is the end edge's start node.
    fn offer_goal(&mut self, total: f64, forward: bool) {
        if total < self.best_end_distance {
            self.best_end_distance = total;
            self.end_edge_forward = forward;
            self.heap.push(State {
                cost: total,
                node: None,
            });
        }
    }
}

pub(crate) fn shortest_path<'g>(
    graph: &'g Graph,
    start: &EdgePoint,
    end: &EdgePoint,
) -> Result<Path<'g>, Error> {
    let start_position = graph
        .edge_position(&start.edge_id)
        .ok_or_else(|| Error::UnknownEdgeId(start.edge_id.clone()))?;
    let end_position = graph
        .edge_position(&end.edge_id)
        .ok_or_else(|| Error::UnknownEdgeId(end.edge_id.clone()))?;
    let start_edge = &graph.edges[start_position];
    let end_edge = &graph.edges[end_position];
    let (start_edge_start, start_edge_end) = graph.edge_endpoints[start_position];
    let (end_edge_start, end_edge_end) = graph.edge_endpoints[end_position];

    let mut search = Search {
        distances: HashMap::new(),
        came_from: HashMap::new(),
        done: FixedBitSet::with_capacity(graph.nodes.len()),
        heap: BinaryHeap::new(),
        best_end_distance: f64::INFINITY,
        end_edge_forward: true,
        end_location: end_edge.location_at(end.distance),
    };
    search.seed(graph, start_edge_start, start.distance);
    search.seed(graph, start_edge_end, start_edge.length - start.distance);

    let mut goal_reached = false;
    while let Some(State { node, .. }) = search.heap.pop() {
        let Some(current) = node else {
            goal_reached = true;
            break;
        };
        if search.done.contains(current) {
            continue;
        }
        search.done.insert(current);
        let from_start = search
            .distances
            .get(&current)
            .copied()
            .unwrap_or(f64::INFINITY);

        if current == end_edge_start {
            search.offer_goal(from_start + end.distance, true);
        }
        if current == end_edge_end {
            search.offer_goal(from_start + end_edge.length - end.distance, false);
        }

        for edge_index in graph.incident_edge_positions(current) {
            let edge = &graph.edges[edge_index];
            let (edge_start, edge_end) = graph.edge_endpoints[edge_index];
            let neighbor = if edge_start == current {
                edge_end
            } else {
                edge_start
            };
            if search.done.contains(neighbor) {
                continue;
            }
            let candidate = from_start + edge.length;
            if candidate
                < search
                    .distances
                    .get(&neighbor)
                    .copied()
                    .unwrap_or(f64::INFINITY)
            {
                search.distances.insert(neighbor, candidate);
                search.came_from.insert(neighbor, edge_index);
                search.heap.push(State {
                    cost: candidate
                        + distance(graph.nodes[neighbor].location, search.end_location),
                    node: Some(neighbor),
                });
            }
        }
    }

    if !goal_reached {
        return Err(Error::NoPath {
            start_edge_id: start.edge_id.clone(),
            end_edge_id: end.edge_id.clone(),
        });
    }

    // Staying on the shared edge may or may not be optimal, so the check
    // compares against the completed search rather than short-circuiting.
    if start.edge_id == end.edge_id
        && (start.distance - end.distance).abs() <= search.best_end_distance
    {
        return Ok(path::canonicalize(path::direct_same_edge(
            start_edge, start, end,
        )));
    }

    let reconstructed = path::reconstruct(
        graph,
        start,
        end,
        start_position,
        end_position,
        search.end_edge_forward,
        search.best_end_distance,
        &search.came_from,
    );
    Ok(path::canonicalize(reconstructed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Id, SimpleEdge, SimpleNode};
    use geo::Coord;

    fn loc(x: f64, y: f64) -> Location {
        Coord { x, y }
    }

    #[test]
    fn path_through_interior_vertices() {
        let graph = Graph::create(
            vec![
                SimpleNode::new("a", loc(0.0, 0.0)),
                SimpleNode::new("b", loc(1.0, 0.0)),
                SimpleNode::new("c", loc(2.0, 0.0)),
                SimpleNode::new("d", loc(3.0, 0.0)),
            ],
            vec![
                SimpleEdge::new("ab", "a", "b"),
                SimpleEdge::new("bc", "b", "c"),
                SimpleEdge::new("cd", "c", "d"),
            ],
        )
        .unwrap();
        let path = graph
            .get_shortest_path(&EdgePoint::new("ab", 0.5), &EdgePoint::new("cd", 0.5))
            .unwrap();
        assert!((path.length - 2.0).abs() < 1e-9);
        assert_eq!(
            path.locations,
            vec![
                loc(0.5, 0.0),
                loc(1.0, 0.0),
                loc(2.0, 0.0),
                loc(2.5, 0.0)
            ]
        );
        let node_ids: Vec<_> = path.nodes.iter().map(|n| &n.id).collect();
        assert_eq!(node_ids, [&Id::from("b"), &Id::from("c")]);
        assert!(path.oriented_edges.iter().all(|o| o.is_forward));
    }

    #[test]
    fn triangle_detour_beats_the_hypotenuse() {
        // 15-20-25 right triangle; going around over the two legs is
        // shorter than staying on the hypotenuse.
        let graph = Graph::create(
            vec![
                SimpleNode::new("a", loc(0.0, 0.0)),
                SimpleNode::new("b", loc(15.0, 0.0)),
                SimpleNode::new("c", loc(0.0, 20.0)),
            ],
            vec![
                SimpleEdge::new("ab", "a", "b"),
                SimpleEdge::new("bc", "b", "c"),
                SimpleEdge::new("ca", "c", "a"),
            ],
        )
        .unwrap();
        let path = graph
            .get_shortest_path(&EdgePoint::new("ca", 15.0), &EdgePoint::new("bc", 5.0))
            .unwrap();
        assert!((path.length - 25.0).abs() < 1e-9);
        assert_eq!(path.locations.len(), 4);
        assert_eq!(path.locations[0], loc(0.0, 5.0));
        assert_eq!(path.locations[1], loc(0.0, 0.0));
        assert_eq!(path.locations[2], loc(15.0, 0.0));
        assert!((path.locations[3].x - 12.0).abs() < 1e-9);
        assert!((path.locations[3].y - 4.0).abs() < 1e-9);
    }

    #[test]
    fn same_edge_pair_leaves_the_edge_when_a_detour_wins() {
        let graph = Graph::create(
            vec![
                SimpleNode::new("a", loc(0.0, 0.0)),
                SimpleNode::new("b", loc(1.0, 0.0)),
            ],
            vec![
                SimpleEdge::with_geometry(
                    "long",
                    "a",
                    "b",
                    vec![loc(0.0, 1.0), loc(1.0, 1.0)],
                ),
                SimpleEdge::new("short", "a", "b"),
            ],
        )
        .unwrap();
        let path = graph
            .get_shortest_path(&EdgePoint::new("long", 0.25), &EdgePoint::new("long", 2.75))
            .unwrap();
        assert!((path.length - 1.5).abs() < 1e-9);
        assert_eq!(path.oriented_edges.len(), 3);
        assert_eq!(path.oriented_edges[0].edge.id, Id::from("long"));
        assert!(!path.oriented_edges[0].is_forward);
        assert_eq!(path.oriented_edges[1].edge.id, Id::from("short"));
        assert_eq!(path.oriented_edges[2].edge.id, Id::from("long"));
        assert!(path.oriented_edges[2].is_forward);
        assert_eq!(
            path.locations,
            vec![
                loc(0.0, 0.25),
                loc(0.0, 0.0),
                loc(1.0, 0.0),
                loc(1.0, 0.25)
            ]
        );
    }

    #[test]
    fn same_edge_pair_stays_on_the_edge_otherwise() {
        let graph = Graph::create(
            vec![
                SimpleNode::new("a", loc(0.0, 0.0)),
                SimpleNode::new("b", loc(10.0, 0.0)),
            ],
            vec![SimpleEdge::new("ab", "a", "b")],
        )
        .unwrap();
        let path = graph
            .get_shortest_path(&EdgePoint::new("ab", 2.0), &EdgePoint::new("ab", 7.5))
            .unwrap();
        assert!((path.length - 5.5).abs() < 1e-12);
        assert_eq!(path.oriented_edges.len(), 1);
        assert!(path.oriented_edges[0].is_forward);
        assert!(path.nodes.is_empty());

        let reversed = graph
            .get_shortest_path(&EdgePoint::new("ab", 7.5), &EdgePoint::new("ab", 2.0))
            .unwrap();
        assert!((reversed.length - 5.5).abs() < 1e-12);
        assert!(!reversed.oriented_edges[0].is_forward);
        assert_eq!(reversed.locations, vec![loc(7.5, 0.0), loc(2.0, 0.0)]);
    }

    #[test]
    fn reversing_the_endpoints_preserves_the_length() {
        let graph = Graph::create(
            vec![
                SimpleNode::new("a", loc(0.0, 0.0)),
                SimpleNode::new("b", loc(3.0, 4.0)),
                SimpleNode::new("c", loc(3.0, 9.0)),
            ],
            vec![
                SimpleEdge::new("ab", "a", "b"),
                SimpleEdge::new("bc", "b", "c"),
            ],
        )
        .unwrap();
        let forward = graph
            .get_shortest_path(&EdgePoint::new("ab", 1.0), &EdgePoint::new("bc", 4.0))
            .unwrap();
        let backward = graph
            .get_shortest_path(&EdgePoint::new("bc", 4.0), &EdgePoint::new("ab", 1.0))
            .unwrap();
        assert!((forward.length - backward.length).abs() < 1e-9);
        let mut reversed_locations = backward.locations.clone();
        reversed_locations.reverse();
        assert_eq!(forward.locations, reversed_locations);
        assert_eq!(
            forward.oriented_edges[0].is_forward,
            !backward.oriented_edges.last().unwrap().is_forward
        );
    }

    #[test]
    fn disconnected_targets_fail_with_both_edge_ids() {
        let graph = Graph::create(
            vec![
                SimpleNode::new("a", loc(0.0, 0.0)),
                SimpleNode::new("b", loc(1.0, 0.0)),
                SimpleNode::new("x", loc(10.0, 0.0)),
                SimpleNode::new("y", loc(11.0, 0.0)),
            ],
            vec![
                SimpleEdge::new("ab", "a", "b"),
                SimpleEdge::new("xy", "x", "y"),
            ],
        )
        .unwrap();
        let error = graph
            .get_shortest_path(&EdgePoint::new("ab", 0.5), &EdgePoint::new("xy", 0.5))
            .unwrap_err();
        let message = error.to_string();
        assert!(message.contains("ab"));
        assert!(message.contains("xy"));
    }

    #[test]
    fn unknown_edge_points_are_rejected() {
        let graph = Graph::create(
            vec![
                SimpleNode::new("a", loc(0.0, 0.0)),
                SimpleNode::new("b", loc(1.0, 0.0)),
            ],
            vec![SimpleEdge::new("ab", "a", "b")],
        )
        .unwrap();
        let error = graph
            .get_shortest_path(&EdgePoint::new("ghost", 0.0), &EdgePoint::new("ab", 0.5))
            .unwrap_err();
        assert!(error.to_string().contains("ghost"));
    }

    #[test]
    fn vertex_to_vertex_query_canonicalizes_cleanly() {
        let graph = Graph::create(
            vec![
                SimpleNode::new("a", loc(0.0, 0.0)),
                SimpleNode::new("b", loc(1.0, 0.0)),
                SimpleNode::new("c", loc(2.0, 0.0)),
            ],
            vec![
                SimpleEdge::new("ab", "a", "b"),
                SimpleEdge::new("bc", "b", "c"),
            ],
        )
        .unwrap();
        // Start sits at the far vertex of ab; the canonical path starts
        // on bc directly.
        let path = graph
            .get_shortest_path(&EdgePoint::new("ab", 1.0), &EdgePoint::new("bc", 0.5))
            .unwrap();
        assert_eq!(path.oriented_edges.len(), 1);
        assert_eq!(path.start, EdgePoint::new("bc", 0.0));
        assert!((path.length - 0.5).abs() < 1e-12);
    }
}
