//! GeoJSON rendering of paths and graphs

use geo::{LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry};
use serde_json::json;

use crate::model::Graph;

use super::path::Path;

impl Path<'_> {
    /// Renders the path as a `GeoJSON` feature collection: the traced
    /// polyline as a `LineString` plus `Point` features for both ends.
    ///
    /// # Panics
    /// Panics if the assembled JSON value is not a valid feature, which
    /// cannot happen for finite coordinates.
    pub fn to_geojson(&self) -> FeatureCollection {
        let line = LineString::from(self.locations.clone());
        let trace = json!({
            "type": "Feature",
            "geometry": Geometry::new((&line).into()),
            "properties": {
                "length": self.length,
                "edge_count": self.oriented_edges.len(),
                "start_edge_id": self.start.edge_id.to_string(),
                "start_distance": self.start.distance,
                "end_edge_id": self.end.edge_id.to_string(),
                "end_distance": self.end.distance,
            }
        });
        let mut features = vec![Feature::from_json_value(trace).unwrap()];
        let endpoints = [
            ("start", self.locations.first()),
            ("end", self.locations.last()),
        ];
        for (role, location) in endpoints {
            if let Some(&location) = location {
                let point = Point::from(location);
                let value = json!({
                    "type": "Feature",
                    "geometry": Geometry::new((&point).into()),
                    "properties": { "role": role }
                });
                features.push(Feature::from_json_value(value).unwrap());
            }
        }
        FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        }
    }

    pub fn to_geojson_string(&self) -> String {
        serde_json::to_string(&self.to_geojson()).unwrap_or_default()
    }
}

impl Graph {
    /// Renders every edge polyline as a `LineString` feature and every
    /// node as a `Point` feature, tagged with their ids.
    ///
    /// # Panics
    /// Panics if the assembled JSON value is not a valid feature, which
    /// cannot happen for finite coordinates.
    pub fn to_geojson(&self) -> FeatureCollection {
        let mut features = Vec::with_capacity(self.edge_count() + self.node_count());
        for edge in self.get_all_edges() {
            let line = edge.line_string();
            let value = json!({
                "type": "Feature",
                "geometry": Geometry::new((&line).into()),
                "properties": {
                    "edge_id": edge.id.to_string(),
                    "start_node_id": edge.start_node_id.to_string(),
                    "end_node_id": edge.end_node_id.to_string(),
                    "length": edge.length,
                }
            });
            features.push(Feature::from_json_value(value).unwrap());
        }
        for node in self.get_all_nodes() {
            let point = Point::from(node.location);
            let value = json!({
                "type": "Feature",
                "geometry": Geometry::new((&point).into()),
                "properties": {
                    "node_id": node.id.to_string(),
                    "degree": node.degree(),
                }
            });
            features.push(Feature::from_json_value(value).unwrap());
        }
        FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        }
    }

    pub fn to_geojson_string(&self) -> String {
        serde_json::to_string(&self.to_geojson()).unwrap_or_default()
    }
}
