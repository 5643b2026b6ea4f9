//! Point-in-ring and point-near-edge tests.

use geo::{Contains as _, Distance as _, Euclidean, Line, Point};
use lot_measure_parcel_models::LatLng;

use crate::area::ring_to_polygon;

/// Whether `point` lies strictly inside `ring`.
///
/// Points on the boundary are not inside; use [`is_on_edge`] for those.
#[must_use]
pub fn contains_point(ring: &[LatLng], point: LatLng) -> bool {
    if ring.len() < 3 {
        return false;
    }
    ring_to_polygon(ring).contains(&Point::new(point.lng, point.lat))
}

/// Whether `point` lies within `tolerance_rad` (an angle, in radians) of
/// any edge of `ring`, including the closing edge.
///
/// Coordinates are projected to a local equirectangular plane around
/// `point` so the distance is measured in radians of arc.
#[must_use]
pub fn is_on_edge(ring: &[LatLng], point: LatLng, tolerance_rad: f64) -> bool {
    let Some(&first) = ring.first() else {
        return false;
    };
    let cos_lat = point.lat.to_radians().cos();
    let project = |p: LatLng| {
        geo::coord! {
            x: (p.lng - point.lng).to_radians() * cos_lat,
            y: (p.lat - point.lat).to_radians(),
        }
    };
    let origin = Point::new(0.0, 0.0);

    ring.iter()
        .zip(ring.iter().skip(1).chain(std::iter::once(&first)))
        .any(|(&a, &b)| {
            let edge = Line::new(project(a), project(b));
            Euclidean.distance(&origin, &edge) <= tolerance_rad
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_EDGE_TOLERANCE_RAD;

    fn square() -> Vec<LatLng> {
        vec![
            LatLng::new(37.0, -122.0),
            LatLng::new(37.0, -121.999),
            LatLng::new(37.001, -121.999),
            LatLng::new(37.001, -122.0),
        ]
    }

    #[test]
    fn interior_point_is_contained() {
        assert!(contains_point(&square(), LatLng::new(37.0005, -121.9995)));
    }

    #[test]
    fn exterior_point_is_not_contained() {
        assert!(!contains_point(&square(), LatLng::new(37.002, -121.9995)));
    }

    #[test]
    fn boundary_point_is_not_strictly_inside_but_is_on_edge() {
        let on_edge = LatLng::new(37.0, -121.9995);
        assert!(!contains_point(&square(), on_edge));
        assert!(is_on_edge(&square(), on_edge, DEFAULT_EDGE_TOLERANCE_RAD));
    }

    #[test]
    fn closing_edge_is_checked() {
        // West edge runs from the last vertex back to the first.
        let near_west = LatLng::new(37.0005, -122.000_05);
        assert!(is_on_edge(&square(), near_west, DEFAULT_EDGE_TOLERANCE_RAD));
    }

    #[test]
    fn tolerance_is_respected() {
        // ~111 m south of the south edge.
        let far = LatLng::new(36.999, -121.9995);
        assert!(!is_on_edge(&square(), far, DEFAULT_EDGE_TOLERANCE_RAD));
        assert!(is_on_edge(&square(), far, 200.0 / crate::EARTH_RADIUS_M));
    }

    #[test]
    fn degenerate_rings_never_panic() {
        let p = LatLng::new(37.0, -122.0);
        assert!(!contains_point(&[], p));
        assert!(!is_on_edge(&[], p, DEFAULT_EDGE_TOLERANCE_RAD));
        assert!(!contains_point(&[p], p));
        assert!(is_on_edge(&[p], p, DEFAULT_EDGE_TOLERANCE_RAD));
    }
}
