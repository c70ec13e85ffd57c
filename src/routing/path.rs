//! Path values: reconstruction from search state and canonicalization

use hashbrown::HashMap;

use crate::geometry::dedupe_locations;
use crate::model::{Edge, EdgePoint, Graph, Location, Node, OrientedEdge};

/// A shortest-path result between two edge points.
///
/// `oriented_edges` is never empty. `nodes` holds the interior junctions
/// between consecutive oriented edges (endpoints excluded), so its length
/// is one less than the edge count. `locations` is the deduped polyline
/// from the coordinates of `start` to those of `end`, and `length` is the
/// sum of traversed sub-edge distances.
#[derive(Debug, Clone)]
pub struct Path<'g> {
    pub start: EdgePoint,
    pub end: EdgePoint,
    pub oriented_edges: Vec<OrientedEdge<'g>>,
    pub nodes: Vec<&'g Node>,
    pub locations: Vec<Location>,
    pub length: f64,
}

/// Single-edge path between two points on the same edge.
pub(crate) fn direct_same_edge<'g>(
    edge: &'g Edge,
    start: &EdgePoint,
    end: &EdgePoint,
) -> Path<'g> {
    Path {
        start: start.clone(),
        end: end.clone(),
        oriented_edges: vec![OrientedEdge {
            edge,
            is_forward: start.distance <= end.distance,
        }],
        nodes: Vec::new(),
        locations: edge.locations_on_interval(start.distance, end.distance),
        length: (start.distance - end.distance).abs(),
    }
}

/// Rebuilds the path by walking the predecessor map backwards from the
/// vertex on which the goal edge was entered.
///
/// All three lists are assembled in reverse order and flipped at the end;
/// the recorded orientations already describe the forward traversal, so
/// only the sequence is reversed. `length` is the total accumulated by the
/// search, never recomputed from the trace.
pub(crate) fn reconstruct<'g>(
    graph: &'g Graph,
    start: &EdgePoint,
    end: &EdgePoint,
    start_position: usize,
    end_position: usize,
    end_forward: bool,
    length: f64,
    came_from: &HashMap<usize, usize>,
) -> Path<'g> {
    let start_edge = &graph.edges[start_position];
    let end_edge = &graph.edges[end_position];
    let (end_start_node, end_end_node) = graph.edge_endpoints[end_position];
    let (start_start_node, start_end_node) = graph.edge_endpoints[start_position];

    let mut oriented_reversed = vec![OrientedEdge {
        edge: end_edge,
        is_forward: end_forward,
    }];
    let mut nodes_reversed: Vec<&Node> = Vec::new();
    let boundary = if end_forward { 0.0 } else { end_edge.length };
    let mut locations_reversed = end_edge.locations_on_interval(end.distance, boundary);
    let mut current = if end_forward {
        end_start_node
    } else {
        end_end_node
    };

    while let Some(&edge_index) = came_from.get(&current) {
        let edge = &graph.edges[edge_index];
        let (edge_start, edge_end) = graph.edge_endpoints[edge_index];
        // The edge is traversed towards `current`, so it runs forward
        // exactly when `current` is its end node.
        let is_forward = edge_end == current;
        oriented_reversed.push(OrientedEdge { edge, is_forward });
        nodes_reversed.push(&graph.nodes[current]);
        if is_forward {
            locations_reversed.extend(edge.locations.iter().rev().copied());
        } else {
            locations_reversed.extend(edge.locations.iter().copied());
        }
        current = if is_forward { edge_start } else { edge_end };
    }

    // `current` is now the vertex through which the path leaves the start
    // edge. A self-loop start edge makes the orientation ambiguous; break
    // the tie by the side of the midpoint the start point lies on.
    let start_forward = if start_start_node == start_end_node {
        start.distance < start_edge.length / 2.0
    } else {
        current == start_end_node
    };
    oriented_reversed.push(OrientedEdge {
        edge: start_edge,
        is_forward: start_forward,
    });
    nodes_reversed.push(&graph.nodes[current]);
    let start_boundary = if start_forward { start_edge.length } else { 0.0 };
    locations_reversed.extend(start_edge.locations_on_interval(start_boundary, start.distance));

    oriented_reversed.reverse();
    nodes_reversed.reverse();
    locations_reversed.reverse();
    Path {
        start: start.clone(),
        end: end.clone(),
        oriented_edges: oriented_reversed,
        nodes: nodes_reversed,
        locations: dedupe_locations(locations_reversed),
        length,
    }
}

/// Strips the zero-length artifacts that arise from representing a vertex
/// as a point at distance 0 of an outgoing edge or at full length of an
/// incoming edge.
pub(crate) fn canonicalize(path: Path<'_>) -> Path<'_> {
    if path.oriented_edges.is_empty() {
        return path;
    }
    let first = path.oriented_edges[0];
    let last = path.oriented_edges[path.oriented_edges.len() - 1];
    let prefix_trivial = if first.is_forward {
        path.start.distance >= first.edge.length
    } else {
        path.start.distance <= 0.0
    };
    let suffix_trivial = if last.is_forward {
        path.end.distance <= 0.0
    } else {
        path.end.distance >= last.edge.length
    };

    if !prefix_trivial && !suffix_trivial {
        return path;
    }
    if prefix_trivial && suffix_trivial && path.oriented_edges.len() <= 2 {
        // The whole path is degenerate: collapse to a point at the end.
        let end_location = last.edge.location_at(path.end.distance);
        return Path {
            start: path.end.clone(),
            end: path.end,
            oriented_edges: vec![last],
            nodes: Vec::new(),
            locations: vec![end_location],
            length: 0.0,
        };
    }
    if path.oriented_edges.len() == 1 {
        return path;
    }

    let mut oriented_edges = path.oriented_edges;
    let mut nodes = path.nodes;
    let mut start = path.start;
    let mut end = path.end;
    if prefix_trivial {
        oriented_edges.remove(0);
        nodes.remove(0);
        if let Some(new_first) = oriented_edges.first() {
            start = if new_first.is_forward {
                EdgePoint::new(new_first.edge.id.clone(), 0.0)
            } else {
                EdgePoint::new(new_first.edge.id.clone(), new_first.edge.length)
            };
        }
    }
    if suffix_trivial {
        oriented_edges.pop();
        nodes.pop();
        if let Some(new_last) = oriented_edges.last() {
            end = if new_last.is_forward {
                EdgePoint::new(new_last.edge.id.clone(), new_last.edge.length)
            } else {
                EdgePoint::new(new_last.edge.id.clone(), 0.0)
            };
        }
    }
    Path {
        start,
        end,
        oriented_edges,
        nodes,
        locations: path.locations,
        length: path.length,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Id, SimpleEdge, SimpleNode};
    use geo::Coord;

    fn loc(x: f64, y: f64) -> Location {
        Coord { x, y }
    }

    fn corridor() -> Graph {
        Graph::create(
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
        .unwrap()
    }

    fn corridor_path(graph: &Graph, start: EdgePoint, end: EdgePoint) -> Path<'_> {
        let ab = graph.get_edge(&Id::from("ab")).unwrap();
        let bc = graph.get_edge(&Id::from("bc")).unwrap();
        let cd = graph.get_edge(&Id::from("cd")).unwrap();
        Path {
            start,
            end,
            oriented_edges: vec![
                OrientedEdge {
                    edge: ab,
                    is_forward: true,
                },
                OrientedEdge {
                    edge: bc,
                    is_forward: true,
                },
                OrientedEdge {
                    edge: cd,
                    is_forward: true,
                },
            ],
            nodes: vec![
                graph.get_node(&Id::from("b")).unwrap(),
                graph.get_node(&Id::from("c")).unwrap(),
            ],
            locations: vec![loc(1.0, 0.0), loc(2.0, 0.0), loc(2.5, 0.0)],
            length: 1.5,
        }
    }

    #[test]
    fn trivial_prefix_is_dropped_and_start_resynthesized() {
        let graph = corridor();
        let path = corridor_path(&graph, EdgePoint::new("ab", 1.0), EdgePoint::new("cd", 0.5));
        let canonical = canonicalize(path);
        assert_eq!(canonical.oriented_edges.len(), 2);
        assert_eq!(canonical.oriented_edges[0].edge.id, Id::from("bc"));
        assert_eq!(canonical.start, EdgePoint::new("bc", 0.0));
        assert_eq!(canonical.nodes.len(), 1);
        assert_eq!(canonical.nodes[0].id, Id::from("c"));
        assert_eq!(canonical.end, EdgePoint::new("cd", 0.5));
    }

    #[test]
    fn trivial_suffix_is_dropped_and_end_resynthesized() {
        let graph = corridor();
        let path = corridor_path(&graph, EdgePoint::new("ab", 0.5), EdgePoint::new("cd", 0.0));
        let canonical = canonicalize(path);
        assert_eq!(canonical.oriented_edges.len(), 2);
        assert_eq!(
            canonical.oriented_edges.last().unwrap().edge.id,
            Id::from("bc")
        );
        assert_eq!(canonical.end, EdgePoint::new("bc", 1.0));
        assert_eq!(canonical.nodes.len(), 1);
        assert_eq!(canonical.nodes[0].id, Id::from("b"));
    }

    #[test]
    fn untouched_path_passes_through() {
        let graph = corridor();
        let path = corridor_path(&graph, EdgePoint::new("ab", 0.5), EdgePoint::new("cd", 0.5));
        let canonical = canonicalize(path);
        assert_eq!(canonical.oriented_edges.len(), 3);
        assert_eq!(canonical.start, EdgePoint::new("ab", 0.5));
    }

    #[test]
    fn doubly_trivial_two_edge_path_collapses_to_a_point() {
        let graph = corridor();
        let ab = graph.get_edge(&Id::from("ab")).unwrap();
        let bc = graph.get_edge(&Id::from("bc")).unwrap();
        let path = Path {
            start: EdgePoint::new("ab", 1.0),
            end: EdgePoint::new("bc", 0.0),
            oriented_edges: vec![
                OrientedEdge {
                    edge: ab,
                    is_forward: true,
                },
                OrientedEdge {
                    edge: bc,
                    is_forward: true,
                },
            ],
            nodes: vec![graph.get_node(&Id::from("b")).unwrap()],
            locations: vec![loc(1.0, 0.0)],
            length: 0.0,
        };
        let canonical = canonicalize(path);
        assert_eq!(canonical.oriented_edges.len(), 1);
        assert!(canonical.nodes.is_empty());
        assert_eq!(canonical.start, canonical.end);
        assert_eq!(canonical.length, 0.0);
        assert_eq!(canonical.locations, vec![loc(1.0, 0.0)]);
    }
}
