//! Normalization of parcel-boundary API payloads into candidate features.
//!
//! The boundary API does not always answer with a well-formed
//! `FeatureCollection`. Accepted shapes, in order of precedence:
//!
//! - `{ "type": "FeatureCollection", "features": [...] }`
//! - `{ "type": "Feature", "geometry": {...}, "properties": {...} }`
//! - `{ "features": [...] }` without a `type`
//! - `{ "geometry": { "type": ..., "coordinates": ... }, "properties": {...} }`
//!
//! Anything else is zero candidates, never an error. Entries without a
//! polygonal geometry that has at least one ring are not candidates.

use geojson::{FeatureCollection, Geometry, Value as GeoValue};
use lot_measure_geometry::flatten;
use lot_measure_parcel_models::ParcelFeature;
use serde_json::Value;

/// Extracts candidate parcels from an upstream payload.
#[must_use]
pub fn normalize_payload(payload: &Value) -> Vec<ParcelFeature> {
    let features: Vec<&Value> = match payload.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => feature_array(payload),
        Some("Feature") => vec![payload],
        _ if payload.get("features").is_some_and(Value::is_array) => feature_array(payload),
        _ if has_geometry(payload) => vec![payload],
        _ => Vec::new(),
    };

    let parcels: Vec<ParcelFeature> = features.into_iter().filter_map(parse_feature).collect();
    log::debug!("Normalized {} parcel candidate(s)", parcels.len());
    parcels
}

/// Builds a `GeoJSON` `FeatureCollection` from normalized candidates.
#[must_use]
pub fn to_feature_collection(parcels: &[ParcelFeature]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: parcels
            .iter()
            .map(|p| geojson::Feature {
                bbox: None,
                geometry: p.geometry.clone(),
                id: None,
                properties: Some(p.properties.clone()),
                foreign_members: None,
            })
            .collect(),
        foreign_members: None,
    }
}

fn feature_array(payload: &Value) -> Vec<&Value> {
    payload
        .get("features")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().collect())
        .unwrap_or_default()
}

fn has_geometry(payload: &Value) -> bool {
    payload
        .get("geometry")
        .is_some_and(|g| g.get("type").is_some() && g.get("coordinates").is_some())
}

/// Non-object entries, geometries that fail to parse, and geometries that
/// are not polygonal or have no ring are dropped.
fn parse_feature(value: &Value) -> Option<ParcelFeature> {
    let obj = value.as_object()?;

    let geometry = obj
        .get("geometry")
        .filter(|g| !g.is_null())
        .and_then(|g| match Geometry::from_json_value(g.clone()) {
            Ok(geometry) => Some(geometry),
            Err(e) => {
                log::warn!("Skipping unparseable parcel geometry: {e}");
                None
            }
        })
        .filter(|g| matches!(g.value, GeoValue::Polygon(_) | GeoValue::MultiPolygon(_)))
        .filter(|g| flatten(g).iter().any(|ring| !ring.is_empty()));

    let Some(geometry) = geometry else {
        log::debug!("Skipping parcel candidate without a polygon");
        return None;
    };

    let properties = obj
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    Some(ParcelFeature {
        geometry: Some(geometry),
        properties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn polygon() -> Value {
        json!({
            "type": "Polygon",
            "coordinates": [[[-122.0, 37.0], [-121.999, 37.0], [-121.999, 37.001], [-122.0, 37.0]]]
        })
    }

    #[test]
    fn feature_collection() {
        let payload = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": polygon(), "properties": { "areaSqFt": 4200 } },
                { "type": "Feature", "geometry": polygon() }
            ]
        });
        let parcels = normalize_payload(&payload);
        assert_eq!(parcels.len(), 2);
        assert!(parcels[0].geometry.is_some());
        assert_eq!(parcels[0].area_sq_ft_property(), Some(4200.0));
        assert!(parcels[1].properties.is_empty());
    }

    #[test]
    fn single_feature() {
        let payload = json!({ "type": "Feature", "geometry": polygon(), "properties": {} });
        assert_eq!(normalize_payload(&payload).len(), 1);
    }

    #[test]
    fn untyped_features_array() {
        let payload = json!({ "features": [{ "geometry": polygon() }] });
        assert_eq!(normalize_payload(&payload).len(), 1);
    }

    #[test]
    fn bare_geometry_with_properties() {
        let payload = json!({ "geometry": polygon(), "properties": { "apn": "123-45" } });
        let parcels = normalize_payload(&payload);
        assert_eq!(parcels.len(), 1);
        assert_eq!(parcels[0].properties["apn"], "123-45");
    }

    #[test]
    fn malformed_payloads_are_zero_candidates() {
        assert!(normalize_payload(&json!(null)).is_empty());
        assert!(normalize_payload(&json!("nope")).is_empty());
        assert!(normalize_payload(&json!({ "type": "FeatureCollection" })).is_empty());
        assert!(normalize_payload(&json!({ "type": "FeatureCollection", "features": 3 })).is_empty());
        assert!(normalize_payload(&json!({ "raw": "<html>" })).is_empty());
    }

    #[test]
    fn entries_without_polygon_are_dropped() {
        let payload = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": { "type": "Polygon", "coordinates": "x" } },
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [1.0, 2.0] } },
                { "type": "Feature", "geometry": { "type": "Polygon", "coordinates": [] } },
                { "type": "Feature", "geometry": null },
                { "type": "Feature", "properties": { "apn": "no-shape" } },
                42,
                { "type": "Feature", "geometry": polygon(), "properties": { "apn": "kept" } }
            ]
        });
        let parcels = normalize_payload(&payload);
        assert_eq!(parcels.len(), 1);
        assert_eq!(parcels[0].properties["apn"], "kept");
        assert!(parcels[0].geometry.is_some());
    }

    #[test]
    fn point_feature_never_becomes_main() {
        let payload = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [-122.0, 37.0] } },
                { "type": "Feature", "geometry": polygon(), "properties": { "apn": "lot" } }
            ]
        });
        let parcels = normalize_payload(&payload);
        let selection = crate::select(&parcels, None);
        let main = &parcels[selection.main().unwrap()];
        assert_eq!(main.properties["apn"], "lot");
        assert!(main.geometry.is_some());
    }

    #[test]
    fn feature_collection_round_trips_candidates() {
        let payload = json!({ "features": [{ "geometry": polygon(), "properties": { "a": 1 } }] });
        let parcels = normalize_payload(&payload);
        let fc = to_feature_collection(&parcels);
        assert_eq!(fc.features.len(), 1);
        let back = normalize_payload(&serde_json::to_value(&fc).unwrap());
        assert_eq!(back, parcels);
    }
}
