//! Arithmetic over polylines represented as location sequences

use crate::model::Location;

use super::primitives::distance;

/// Cumulative distances along a polyline.
///
/// The result has the same length as the input; entry `i` is the length of
/// the polyline restricted to the first `i + 1` locations, so the first
/// entry is `0.0` and the last is the total length.
pub fn cumulative_distances(locations: &[Location]) -> Vec<f64> {
    let mut distances = Vec::with_capacity(locations.len());
    let mut total = 0.0;
    for (i, location) in locations.iter().enumerate() {
        if i > 0 {
            total += distance(locations[i - 1], *location);
        }
        distances.push(total);
    }
    distances
}

/// Largest index `i` with `sorted[i] <= x`, or `None` when `x` is strictly
/// below every element.
pub fn find_floor_index(sorted: &[f64], x: f64) -> Option<usize> {
    sorted.partition_point(|value| *value <= x).checked_sub(1)
}

/// Collapses runs of identical consecutive locations to a single copy.
pub fn dedupe_locations(mut locations: Vec<Location>) -> Vec<Location> {
    locations.dedup();
    locations
}
