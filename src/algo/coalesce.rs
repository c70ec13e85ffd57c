//! Degree-2 chain coalescing
//!
//! Rebuilds a graph so that no interior node has degree 2: every maximal
//! chain of degree-2 junctions collapses into a single polyline edge. An
//! isolated simple cycle collapses into one node carrying a self-loop.

use fixedbitset::FixedBitSet;
use log::debug;

use crate::error::Error;
use crate::geometry::dedupe_locations;
use crate::model::{Graph, Location, SimpleEdge, SimpleNode};

/// One traversed edge in a chain: edge position and traversal direction.
type Link = (usize, bool);

struct Chain {
    links: Vec<Link>,
}

pub(crate) fn coalesce(graph: &Graph) -> Result<Graph, Error> {
    let mut remaining = FixedBitSet::with_capacity(graph.edges.len());
    remaining.insert_range(..);
    let mut removed_nodes = FixedBitSet::with_capacity(graph.nodes.len());
    let mut new_edges: Vec<SimpleEdge> = Vec::with_capacity(graph.edges.len());

    for position in 0..graph.edges.len() {
        if !remaining.contains(position) {
            continue;
        }
        let chain = maximal_chain(graph, position);
        for &(link_position, _) in &chain.links {
            remaining.set(link_position, false);
        }

        if chain.links.len() == 1 {
            let edge = &graph.edges[position];
            new_edges.push(SimpleEdge::with_geometry(
                edge.id.clone(),
                edge.start_node_id.clone(),
                edge.end_node_id.clone(),
                edge.inner_locations.clone(),
            ));
            continue;
        }

        let (first_position, first_forward) = chain.links[0];
        let (last_position, last_forward) = chain.links[chain.links.len() - 1];
        let start_node = oriented_start(graph, first_position, first_forward);
        let end_node = oriented_end(graph, last_position, last_forward);

        // Deterministic id for the merged edge: the minimum constituent id.
        let merged_id = chain
            .links
            .iter()
            .map(|&(link_position, _)| &graph.edges[link_position].id)
            .min()
            .cloned()
            .unwrap_or_else(|| graph.edges[first_position].id.clone());

        let mut combined: Vec<Location> = Vec::new();
        for &(link_position, forward) in &chain.links {
            let edge = &graph.edges[link_position];
            if forward {
                combined.extend(edge.locations.iter().copied());
            } else {
                combined.extend(edge.locations.iter().rev().copied());
            }
        }
        let combined = dedupe_locations(combined);
        let inner_locations = if combined.len() >= 2 {
            combined[1..combined.len() - 1].to_vec()
        } else {
            Vec::new()
        };

        new_edges.push(SimpleEdge::with_geometry(
            merged_id,
            graph.nodes[start_node].id.clone(),
            graph.nodes[end_node].id.clone(),
            inner_locations,
        ));

        for i in 0..chain.links.len() - 1 {
            let (link_position, forward) = chain.links[i];
            let junction = oriented_end(graph, link_position, forward);
            if junction != start_node && junction != end_node {
                removed_nodes.insert(junction);
            }
        }
    }

    let new_nodes: Vec<SimpleNode> = graph
        .nodes
        .iter()
        .enumerate()
        .filter(|(position, _)| !removed_nodes.contains(*position))
        .map(|(_, node)| SimpleNode::new(node.id.clone(), node.location))
        .collect();

    debug!(
        "coalesced {} edges / {} nodes into {} edges / {} nodes",
        graph.edges.len(),
        graph.nodes.len(),
        new_edges.len(),
        new_nodes.len()
    );
    Graph::create(new_nodes, new_edges)
}

fn oriented_start(graph: &Graph, edge_position: usize, forward: bool) -> usize {
    let (start, end) = graph.edge_endpoints[edge_position];
    if forward {
        start
    } else {
        end
    }
}

fn oriented_end(graph: &Graph, edge_position: usize, forward: bool) -> usize {
    let (start, end) = graph.edge_endpoints[edge_position];
    if forward {
        end
    } else {
        start
    }
}

/// The maximal chain through `start`: the edge itself oriented forward,
/// extended in both directions across degree-2 junctions. On an isolated
/// simple cycle the forward extension wraps around to the start edge and
/// the chain is the cycle walked once.
fn maximal_chain(graph: &Graph, start: usize) -> Chain {
    let (forward_links, wrapped) = extend(graph, start, true);
    if wrapped {
        return Chain {
            links: forward_links,
        };
    }
    let (backward_links, _) = extend(graph, start, false);
    let mut links: Vec<Link> = backward_links[1..]
        .iter()
        .rev()
        .map(|&(position, forward)| (position, !forward))
        .collect();
    links.extend(forward_links);
    Chain { links }
}

/// Walks from `start` (traversed in `start_forward` direction) across
/// degree-2 junctions. Returns the traversed links and whether the walk
/// wrapped around to the start edge.
fn extend(graph: &Graph, start: usize, start_forward: bool) -> (Vec<Link>, bool) {
    let mut links: Vec<Link> = Vec::new();
    let mut current: Link = (start, start_forward);
    loop {
        links.push(current);
        let (position, forward) = current;
        let node_position = oriented_end(graph, position, forward);
        let node = &graph.nodes[node_position];
        if node.degree() != 2 {
            return (links, false);
        }
        let current_id = &graph.edges[position].id;
        // The other incidence at a degree-2 node; both incidences carry
        // the current id exactly when the current edge is a self-loop.
        let Some(next_id) = node.edge_ids.iter().find(|&id| id != current_id) else {
            return (links, true);
        };
        let Some(next_position) = graph.edge_position(next_id) else {
            return (links, false);
        };
        if next_position == links[0].0 {
            return (links, true);
        }
        let (next_start, _) = graph.edge_endpoints[next_position];
        current = (next_position, next_start == node_position);
    }
}
