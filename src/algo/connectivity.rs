//! Connected-component extraction

use fixedbitset::FixedBitSet;
use petgraph::graph::NodeIndex;
use petgraph::visit::Bfs;

use crate::error::Error;
use crate::model::{Graph, Id, SimpleEdge, SimpleNode};

pub(crate) fn connected_component_of_node(graph: &Graph, id: &Id) -> Result<Graph, Error> {
    let position = graph
        .node_position(id)
        .ok_or_else(|| Error::UnknownNodeId(id.clone()))?;
    let members = reachable_from(graph, position);
    extract(graph, &members)
}

pub(crate) fn connected_components(graph: &Graph) -> Result<Vec<Graph>, Error> {
    let mut seen = FixedBitSet::with_capacity(graph.nodes.len());
    let mut components = Vec::new();
    for position in 0..graph.nodes.len() {
        if seen.contains(position) {
            continue;
        }
        let members = reachable_from(graph, position);
        seen.union_with(&members);
        components.push(extract(graph, &members)?);
    }
    Ok(components)
}

fn reachable_from(graph: &Graph, position: usize) -> FixedBitSet {
    let mut members = FixedBitSet::with_capacity(graph.nodes.len());
    let mut bfs = Bfs::new(&graph.adjacency, NodeIndex::new(position));
    while let Some(index) = bfs.next(&graph.adjacency) {
        members.insert(index.index());
    }
    members
}

/// Builds the component as a fresh graph by filtering the parent's node
/// and edge lists, so insertion order carries over.
fn extract(graph: &Graph, members: &FixedBitSet) -> Result<Graph, Error> {
    let nodes: Vec<SimpleNode> = graph
        .nodes
        .iter()
        .enumerate()
        .filter(|(position, _)| members.contains(*position))
        .map(|(_, node)| SimpleNode::new(node.id.clone(), node.location))
        .collect();
    let edges: Vec<SimpleEdge> = graph
        .edges
        .iter()
        .enumerate()
        .filter(|(position, _)| {
            let (start, _) = graph.edge_endpoints[*position];
            members.contains(start)
        })
        .map(|(_, edge)| {
            SimpleEdge::with_geometry(
                edge.id.clone(),
                edge.start_node_id.clone(),
                edge.end_node_id.clone(),
                edge.inner_locations.clone(),
            )
        })
        .collect();
    Graph::create(nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Location;
    use geo::Coord;

    fn loc(x: f64, y: f64) -> Location {
        Coord { x, y }
    }

    fn two_component_graph() -> Graph {
        Graph::create(
            vec![
                SimpleNode::new("a", loc(0.0, 0.0)),
                SimpleNode::new("x", loc(10.0, 0.0)),
                SimpleNode::new("b", loc(1.0, 0.0)),
                SimpleNode::new("y", loc(11.0, 0.0)),
                SimpleNode::new("lonely", loc(-5.0, -5.0)),
            ],
            vec![
                SimpleEdge::new("ab", "a", "b"),
                SimpleEdge::new("xy", "x", "y"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn components_enumerate_in_first_occurrence_order() {
        let graph = two_component_graph();
        let components = graph.get_connected_components().unwrap();
        assert_eq!(components.len(), 3);
        assert_eq!(components[0].get_all_nodes()[0].id, Id::from("a"));
        assert_eq!(components[1].get_all_nodes()[0].id, Id::from("x"));
        assert_eq!(components[2].get_all_nodes()[0].id, Id::from("lonely"));
    }

    #[test]
    fn component_nodes_cover_the_graph_exactly_once() {
        let graph = two_component_graph();
        let components = graph.get_connected_components().unwrap();
        let mut ids: Vec<Id> = components
            .iter()
            .flat_map(|component| component.get_all_nodes().iter().map(|n| n.id.clone()))
            .collect();
        ids.sort();
        let mut expected: Vec<Id> = graph
            .get_all_nodes()
            .iter()
            .map(|n| n.id.clone())
            .collect();
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[test]
    fn component_of_node_keeps_parent_order() {
        let graph = two_component_graph();
        let component = graph
            .get_connected_component_of_node(&Id::from("b"))
            .unwrap();
        let ids: Vec<_> = component.get_all_nodes().iter().map(|n| &n.id).collect();
        assert_eq!(ids, [&Id::from("a"), &Id::from("b")]);
        assert_eq!(component.edge_count(), 1);
    }

    #[test]
    fn isolated_node_forms_its_own_component() {
        let graph = two_component_graph();
        let component = graph
            .get_connected_component_of_node(&Id::from("lonely"))
            .unwrap();
        assert_eq!(component.node_count(), 1);
        assert_eq!(component.edge_count(), 0);
    }

    #[test]
    fn unknown_node_is_an_error() {
        let graph = two_component_graph();
        let error = graph
            .get_connected_component_of_node(&Id::from("ghost"))
            .unwrap_err();
        assert!(error.to_string().contains("ghost"));
    }
}
