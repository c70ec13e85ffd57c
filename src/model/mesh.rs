//! Spatial sample mesh backing approximate closest-point queries

use log::info;
use rstar::{primitives::GeomWithData, RTree};

use crate::geometry::{closest_point_on_segment, find_floor_index};

use super::{EdgePoint, Graph, Location};

/// One sample point: the edge it lies on and the index of the polyline
/// segment containing it, for exact refinement after the tree lookup.
#[derive(Debug, Clone)]
struct MeshSample {
    edge_position: usize,
    location_index: usize,
}

type SamplePoint = GeomWithData<[f64; 2], MeshSample>;

/// R-tree of sample points spaced at most `precision` apart along every
/// edge polyline. The tree answers approximate nearest-neighbor queries;
/// refining the hit against its own segment makes the result exact up to
/// the sample spacing.
#[derive(Debug, Clone)]
pub(crate) struct ClosestPointMesh {
    tree: RTree<SamplePoint>,
}

impl ClosestPointMesh {
    pub(crate) fn build(graph: &Graph, precision: f64) -> Self {
        let mut samples = Vec::new();

        // Every node covers the endpoints of its incident edges; sampling
        // through the first incident edge keeps one sample per node.
        for node in &graph.nodes {
            let Some(first_edge_id) = node.edge_ids.first() else {
                continue;
            };
            let Some(edge_position) = graph.edge_position(first_edge_id) else {
                continue;
            };
            let edge = &graph.edges[edge_position];
            let location_index = if edge.start_node_id == node.id {
                0
            } else {
                edge.locations.len() - 2
            };
            samples.push(SamplePoint::new(
                [node.location.x, node.location.y],
                MeshSample {
                    edge_position,
                    location_index,
                },
            ));
        }

        for (edge_position, edge) in graph.edges.iter().enumerate() {
            let steps = (edge.length / precision).ceil();
            if !steps.is_finite() || steps < 2.0 {
                continue;
            }
            let steps = steps as usize;
            let step = edge.length / steps as f64;
            for i in 1..steps {
                let distance = i as f64 * step;
                let location_index = find_floor_index(&edge.location_distances, distance)
                    .unwrap_or(0)
                    .min(edge.locations.len() - 2);
                let location = edge.location_at(distance);
                samples.push(SamplePoint::new(
                    [location.x, location.y],
                    MeshSample {
                        edge_position,
                        location_index,
                    },
                ));
            }
        }

        info!(
            "built closest-point mesh: {} samples over {} edges at precision {}",
            samples.len(),
            graph.edges.len(),
            precision
        );
        Self {
            tree: RTree::bulk_load(samples),
        }
    }

    /// Nearest edge point to `location`, or `None` when the mesh is empty
    /// (a graph without edges).
    pub(crate) fn nearest(&self, graph: &Graph, location: Location) -> Option<EdgePoint> {
        let hit = self.tree.nearest_neighbor(&[location.x, location.y])?;
        let MeshSample {
            edge_position,
            location_index,
        } = hit.data.clone();
        let edge = &graph.edges[edge_position];
        let projection = closest_point_on_segment(
            location,
            edge.locations[location_index],
            edge.locations[location_index + 1],
        );
        Some(EdgePoint {
            edge_id: edge.id.clone(),
            distance: edge.location_distances[location_index] + projection.distance_down_segment,
        })
    }
}
