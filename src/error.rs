use thiserror::Error;

use crate::model::Id;

#[derive(Error, Debug)]
pub enum Error {
    #[error("duplicate node id {0}")]
    DuplicateNodeId(Id),
    #[error("duplicate edge id {0}")]
    DuplicateEdgeId(Id),
    #[error("edge {edge_id} references unknown node {node_id}")]
    UnknownReferencedNode { edge_id: Id, node_id: Id },
    #[error("unknown node id {0}")]
    UnknownNodeId(Id),
    #[error("unknown edge id {0}")]
    UnknownEdgeId(Id),
    #[error("node {node_id} is not an endpoint of edge {edge_id}")]
    NotAnEndpoint { edge_id: Id, node_id: Id },
    #[error("no path from edge {start_edge_id} to edge {end_edge_id}")]
    NoPath { start_edge_id: Id, end_edge_id: Id },
    #[error("cannot advance by negative distance {0}")]
    NegativeDistance(f64),
    #[error("closest-point query on a graph with no edges")]
    EmptyGraph,
}
