//! Segment-level Euclidean primitives

use crate::model::Location;

/// Euclidean distance between two locations.
pub fn distance(a: Location, b: Location) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// The point reached by travelling `travelled` along the segment `a -> b`.
///
/// The parameter is clamped to the segment, so a negative distance yields
/// `a` and a distance past `b` yields `b`. A zero-length segment always
/// yields `a` (the NaN produced by `travelled / 0.0` clamps to the start).
pub fn point_along_segment(a: Location, b: Location, travelled: f64) -> Location {
    let length = distance(a, b);
    let t = (travelled / length).clamp(0.0, 1.0);
    let t = if t.is_nan() { 0.0 } else { t };
    Location {
        x: (1.0 - t) * a.x + t * b.x,
        y: (1.0 - t) * a.y + t * b.y,
    }
}

/// Result of projecting a location onto a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    /// Distance from the segment start to the projected point, along the segment.
    pub distance_down_segment: f64,
    /// Distance from the queried location to the projected point.
    pub distance_from_location: f64,
}

/// Projects `location` onto the segment `a -> b`, clamped to the segment.
///
/// A degenerate segment (`a == b`) projects everything onto `a`.
pub fn closest_point_on_segment(location: Location, a: Location, b: Location) -> SegmentProjection {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_squared = dx * dx + dy * dy;
    if length_squared == 0.0 {
        return SegmentProjection {
            distance_down_segment: 0.0,
            distance_from_location: distance(location, a),
        };
    }
    let t = (((location.x - a.x) * dx + (location.y - a.y) * dy) / length_squared).clamp(0.0, 1.0);
    let projected = Location {
        x: a.x + t * dx,
        y: a.y + t * dy,
    };
    SegmentProjection {
        distance_down_segment: t * length_squared.sqrt(),
        distance_from_location: distance(location, projected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;

    #[test]
    fn distance_is_euclidean() {
        let d = distance(Coord { x: 0.0, y: 0.0 }, Coord { x: 3.0, y: 4.0 });
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn point_along_segment_interpolates_and_clamps() {
        let a = Coord { x: 0.0, y: 0.0 };
        let b = Coord { x: 10.0, y: 0.0 };
        assert_eq!(point_along_segment(a, b, 4.0), Coord { x: 4.0, y: 0.0 });
        assert_eq!(point_along_segment(a, b, -1.0), a);
        assert_eq!(point_along_segment(a, b, 25.0), b);
    }

    #[test]
    fn point_along_zero_length_segment_is_the_start() {
        let a = Coord { x: 2.5, y: -1.0 };
        assert_eq!(point_along_segment(a, a, 3.0), a);
        assert_eq!(point_along_segment(a, a, 0.0), a);
    }

    #[test]
    fn projection_lands_inside_the_segment() {
        let p = closest_point_on_segment(
            Coord { x: 5.0, y: 10.0 },
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 12.0, y: 9.0 },
        );
        assert!((p.distance_down_segment - 10.0).abs() < 1e-9);
        let expected = distance(Coord { x: 5.0, y: 10.0 }, Coord { x: 8.0, y: 6.0 });
        assert!((p.distance_from_location - expected).abs() < 1e-9);
    }

    #[test]
    fn projection_clamps_to_the_near_end() {
        let p = closest_point_on_segment(
            Coord { x: -3.0, y: 4.0 },
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 10.0, y: 0.0 },
        );
        assert_eq!(p.distance_down_segment, 0.0);
        assert!((p.distance_from_location - 5.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_segment_projects_onto_the_point() {
        let a = Coord { x: 1.0, y: 1.0 };
        let p = closest_point_on_segment(Coord { x: 4.0, y: 5.0 }, a, a);
        assert_eq!(p.distance_down_segment, 0.0);
        assert!((p.distance_from_location - 5.0).abs() < 1e-12);
    }
}
