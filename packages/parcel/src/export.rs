//! `GeoJSON` export of parcels and drawn shapes.
//!
//! Each shape becomes one `Polygon` feature with a closed ring and a
//! `role` property (`parcel`, `lot`, `neighbor`, or `turf`).

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use lot_measure_geometry::{GeometryOps, flatten_feature};
use lot_measure_parcel_models::{LatLng, Ring, ShapeRole};
use serde::{Deserialize, Serialize};

use crate::drawing::Measurements;
use crate::session::ParcelSession;

/// A ring tagged with the role it plays in the export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportShape {
    /// Role written to `properties.role`.
    pub role: ShapeRole,
    /// Outline in `(lat, lng)` order; closed on export if open.
    pub ring: Ring,
}

/// Returns `ring` with its first point repeated at the end if it is not
/// already closed.
#[must_use]
pub fn close_ring(ring: &[LatLng]) -> Ring {
    let mut closed = ring.to_vec();
    match (ring.first(), ring.last()) {
        (Some(&first), Some(&last)) if first != last => closed.push(first),
        _ => {}
    }
    closed
}

/// Converts one shape into a `GeoJSON` feature. Empty rings yield `None`.
#[must_use]
pub fn shape_feature(shape: &ExportShape) -> Option<Feature> {
    if shape.ring.is_empty() {
        return None;
    }

    let positions: Vec<Vec<f64>> = close_ring(&shape.ring)
        .into_iter()
        .map(LatLng::to_position)
        .collect();

    let mut properties = JsonObject::new();
    properties.insert("role".to_string(), shape.role.as_str().into());
    properties.insert(
        "areaSqFt".to_string(),
        lot_measure_geometry::rings_area_sq_ft(std::slice::from_ref(&shape.ring)).into(),
    );

    Some(Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Polygon(vec![positions]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

/// Builds a `FeatureCollection` from `shapes`, skipping empty rings.
#[must_use]
pub fn feature_collection(shapes: &[ExportShape]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: shapes.iter().filter_map(shape_feature).collect(),
        foreign_members: None,
    }
}

/// Collects the shapes of a session: main parcel rings as `parcel`,
/// neighbor rings as `neighbor`, then every drawn shape by its role.
#[must_use]
pub fn session_shapes<O: GeometryOps>(
    session: &ParcelSession<O>,
    measurements: &Measurements,
) -> Vec<ExportShape> {
    let mut shapes = Vec::new();

    if let Some(selection) = session.selection() {
        for (index, role) in selection.roles() {
            let Some(feature) = session.features().get(index) else {
                continue;
            };
            shapes.extend(flatten_feature(feature).into_iter().map(|ring| ExportShape {
                role: role.into(),
                ring,
            }));
        }
    }

    shapes.extend(measurements.shapes().iter().map(|s| ExportShape {
        role: s.role.into(),
        ring: s.ring.clone(),
    }));

    shapes
}

/// Exports a whole session as a `FeatureCollection`.
#[must_use]
pub fn session_feature_collection<O: GeometryOps>(
    session: &ParcelSession<O>,
    measurements: &Measurements,
) -> FeatureCollection {
    feature_collection(&session_shapes(session, measurements))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{DrawnRole, DrawnShape};
    use crate::test_support::{point, square_feature};

    fn open_ring() -> Ring {
        vec![
            point(37.0, -122.0),
            point(37.0, -121.999),
            point(37.001, -121.999),
        ]
    }

    #[test]
    fn open_ring_is_closed() {
        let closed = close_ring(&open_ring());
        assert_eq!(closed.len(), 4);
        assert_eq!(closed.first(), closed.last());
    }

    #[test]
    fn closed_ring_is_unchanged() {
        let closed = close_ring(&open_ring());
        assert_eq!(close_ring(&closed), closed);
        assert!(close_ring(&[]).is_empty());
    }

    #[test]
    fn feature_has_closed_lng_lat_ring_and_role() {
        let feature = shape_feature(&ExportShape {
            role: ShapeRole::Turf,
            ring: open_ring(),
        })
        .unwrap();

        let Some(Geometry {
            value: Value::Polygon(rings),
            ..
        }) = &feature.geometry
        else {
            panic!("expected polygon geometry");
        };
        assert_eq!(rings[0].first(), rings[0].last());
        assert_eq!(rings[0][1], vec![-121.999, 37.0]);

        let props = feature.properties.unwrap();
        assert_eq!(props["role"], "turf");
        assert!(props["areaSqFt"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn empty_rings_are_skipped() {
        let fc = feature_collection(&[
            ExportShape {
                role: ShapeRole::Lot,
                ring: Vec::new(),
            },
            ExportShape {
                role: ShapeRole::Lot,
                ring: open_ring(),
            },
        ]);
        assert_eq!(fc.features.len(), 1);
    }

    #[test]
    fn session_export_tags_every_role() {
        let mut session: ParcelSession = ParcelSession::default();
        session.load(
            vec![
                square_feature(37.01, -122.0, 0.001),
                square_feature(37.0, -122.0, 0.001),
            ],
            Some(point(37.0005, -121.9995)),
        );
        let mut measurements = Measurements::new();
        measurements.add(DrawnShape {
            role: DrawnRole::Turf,
            ring: open_ring(),
        });

        let shapes = session_shapes(&session, &measurements);
        let roles: Vec<_> = shapes.iter().map(|s| s.role).collect();
        assert_eq!(
            roles,
            vec![ShapeRole::Parcel, ShapeRole::Neighbor, ShapeRole::Turf]
        );
        assert_eq!(shapes[0].ring[0], point(37.0, -122.0));

        let fc = session_feature_collection(&session, &measurements);
        assert_eq!(fc.features.len(), 3);
    }
}
