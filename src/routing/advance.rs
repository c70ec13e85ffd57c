//! Advancing a computed path (or a raw polyline) forward by a distance

use crate::error::Error;
use crate::geometry::{distance, point_along_segment};
use crate::model::{EdgePoint, Location};

use super::path::Path;

/// Drops the first `advance_by` of a polyline, splitting the segment the
/// cut lands on. Advancing by the total length or more leaves the final
/// location only.
pub fn advance_along_locations(
    locations: &[Location],
    advance_by: f64,
) -> Result<Vec<Location>, Error> {
    if advance_by < 0.0 {
        return Err(Error::NegativeDistance(advance_by));
    }
    if advance_by == 0.0 {
        return Ok(locations.to_vec());
    }
    let mut remaining = advance_by;
    for (index, window) in locations.windows(2).enumerate() {
        let segment = distance(window[0], window[1]);
        if remaining >= segment {
            remaining -= segment;
            continue;
        }
        let split = point_along_segment(window[0], window[1], remaining);
        let mut result = Vec::with_capacity(locations.len() - index);
        result.push(split);
        result.extend_from_slice(&locations[index + 1..]);
        return Ok(result);
    }
    Ok(locations.last().map(|&last| vec![last]).unwrap_or_default())
}

/// Moves the start of a path forward by `advance_by`, dropping fully
/// consumed oriented edges and their boundary nodes. Advancing past the
/// end yields a zero-length path sitting at the end point.
pub fn advance_along_path<'g>(path: &Path<'g>, advance_by: f64) -> Result<Path<'g>, Error> {
    if advance_by < 0.0 {
        return Err(Error::NegativeDistance(advance_by));
    }
    if advance_by == 0.0 {
        return Ok(path.clone());
    }
    if advance_by >= path.length {
        return Ok(terminal_path(path));
    }

    let mut remaining = advance_by;
    let mut consumed = 0;
    let mut new_start = path.start.clone();
    for (index, oriented) in path.oriented_edges.iter().enumerate() {
        let leg = if index == 0 {
            if oriented.is_forward {
                oriented.edge.length - path.start.distance
            } else {
                path.start.distance
            }
        } else {
            oriented.edge.length
        };
        if remaining >= leg && index + 1 < path.oriented_edges.len() {
            remaining -= leg;
            consumed += 1;
            continue;
        }
        let distance_down_edge = if index == 0 {
            if oriented.is_forward {
                path.start.distance + remaining
            } else {
                path.start.distance - remaining
            }
        } else if oriented.is_forward {
            remaining
        } else {
            oriented.edge.length - remaining
        };
        new_start = EdgePoint {
            edge_id: oriented.edge.id.clone(),
            distance: distance_down_edge,
        };
        break;
    }

    Ok(Path {
        start: new_start,
        end: path.end.clone(),
        oriented_edges: path.oriented_edges[consumed..].to_vec(),
        nodes: path.nodes[consumed..].to_vec(),
        locations: advance_along_locations(&path.locations, advance_by)?,
        length: path.length - advance_by,
    })
}

fn terminal_path<'g>(path: &Path<'g>) -> Path<'g> {
    let Some(&last) = path.oriented_edges.last() else {
        return path.clone();
    };
    let end_location = last.edge.location_at(path.end.distance);
    Path {
        start: path.end.clone(),
        end: path.end.clone(),
        oriented_edges: vec![last],
        nodes: Vec::new(),
        locations: vec![end_location],
        length: 0.0,
    }
}
