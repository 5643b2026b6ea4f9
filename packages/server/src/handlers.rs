//! HTTP handler functions for the lot-measure API.

use actix_web::{HttpResponse, http::StatusCode, http::header, web};
use lot_measure_geometry::GeoOps;
use lot_measure_parcel::{ParcelSession, feature_collection, lot_sq_ft, normalize_payload};
use lot_measure_parcel_models::{LatLng, ParcelFeature, ParcelRole};
use lot_measure_precisely::{ParcelQuery, UpstreamResponse};
use lot_measure_server_models::{
    ApiError, ApiHealth, ApiParcel, ApiSelection, ExportRequest, ParcelQueryParams, SelectRequest,
};

use crate::AppState;

const MISSING_QUERY: &str = "Provide ?address=... OR ?lat=...&lng=...";
const PROXY_CACHE_CONTROL: &str = "s-maxage=300, stale-while-revalidate=600";
const EXPORT_FILENAME: &str = "lot-measure.geojson";

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/parcel-by-address`
///
/// Fetch-through proxy to the parcel-boundary API. The upstream status and
/// body are passed through unchanged.
pub async fn parcel_by_address(
    state: web::Data<AppState>,
    params: web::Query<ParcelQueryParams>,
) -> HttpResponse {
    let Some(query) = query_from(&params) else {
        return HttpResponse::BadRequest().json(ApiError::new(MISSING_QUERY));
    };

    match state.precisely.fetch(&query).await {
        Ok(upstream) => HttpResponse::build(upstream_status(&upstream))
            .insert_header((header::CACHE_CONTROL, PROXY_CACHE_CONTROL))
            .json(upstream.body),
        Err(e) => {
            log::error!("Parcel lookup failed: {e}");
            HttpResponse::InternalServerError().json(ApiError::new(e.to_string()))
        }
    }
}

/// `GET /api/parcels`
///
/// Looks up candidates and picks the main parcel. The focus point is
/// `focusLat`/`focusLng` if given, else the lookup coordinate for a
/// location query, else none (first candidate wins).
pub async fn parcels(
    state: web::Data<AppState>,
    params: web::Query<ParcelQueryParams>,
) -> HttpResponse {
    let Some(query) = query_from(&params) else {
        return HttpResponse::BadRequest().json(ApiError::new(MISSING_QUERY));
    };

    let upstream = match state.precisely.fetch(&query).await {
        Ok(upstream) => upstream,
        Err(e) => {
            log::error!("Parcel lookup failed: {e}");
            return HttpResponse::InternalServerError().json(ApiError::new(e.to_string()));
        }
    };

    if !upstream.is_success() {
        return HttpResponse::build(upstream_status(&upstream)).json(serde_json::json!({
            "error": format!("Parcel API returned status {}", upstream.status),
            "upstream": upstream.body,
        }));
    }

    let focus = params.focus().or_else(|| {
        query
            .location()
            .map(|(lat, lng)| LatLng::new(lat, lng))
    });

    HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, PROXY_CACHE_CONTROL))
        .json(resolve(normalize_payload(&upstream.body), focus))
}

/// `POST /api/parcels/select`
///
/// Click-to-correct: re-runs the selection over a candidate set the client
/// already holds, using the clicked point as the focus.
pub async fn select_parcels(body: web::Json<SelectRequest>) -> HttpResponse {
    let SelectRequest { candidates, focus } = body.into_inner();
    HttpResponse::Ok().json(resolve(normalize_payload(&candidates), focus))
}

/// `POST /api/export`
///
/// Returns the shapes as a `GeoJSON` `FeatureCollection` download.
pub async fn export(body: web::Json<ExportRequest>) -> HttpResponse {
    let collection = feature_collection(&body.shapes);
    match serde_json::to_string(&collection) {
        Ok(json) => HttpResponse::Ok()
            .content_type("application/geo+json")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ))
            .body(json),
        Err(e) => {
            log::error!("Failed to serialize export: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Failed to build export"))
        }
    }
}

fn query_from(params: &ParcelQueryParams) -> Option<ParcelQuery> {
    ParcelQuery::from_params(params.address.as_deref(), params.lat, params.lng)
}

fn upstream_status(upstream: &UpstreamResponse) -> StatusCode {
    StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY)
}

/// Runs one selection pass and shapes the response.
fn resolve(features: Vec<ParcelFeature>, focus: Option<LatLng>) -> ApiSelection {
    let mut session: ParcelSession = ParcelSession::default();
    let tier = session.load(features, focus).and_then(|s| s.tier);

    let parcels = session
        .selection()
        .map(|selection| {
            selection
                .roles()
                .filter_map(|(index, role)| {
                    let feature = session.features().get(index)?;
                    Some(ApiParcel {
                        index,
                        role,
                        is_main: role == ParcelRole::Main,
                        geometry: feature.geometry.clone(),
                        properties: feature.properties.clone(),
                        lot_sq_ft: lot_sq_ft(feature, &GeoOps),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    ApiSelection {
        parcels,
        tier,
        focus,
        main_lot_sq_ft: session.main_lot_sq_ft(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test};
    use lot_measure_precisely::{PreciselyClient, PreciselyConfig};
    use lot_measure_parcel_models::SelectionTier;

    use super::*;

    fn state() -> web::Data<AppState> {
        let client = PreciselyClient::new(PreciselyConfig::embedded(), None).unwrap();
        web::Data::new(AppState {
            precisely: Arc::new(client),
        })
    }

    fn square(lng: f64, lat: f64) -> serde_json::Value {
        serde_json::json!({
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [lng, lat], [lng + 0.001, lat], [lng + 0.001, lat + 0.001],
                    [lng, lat + 0.001], [lng, lat]
                ]]
            },
            "properties": {}
        })
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app =
            test::init_service(App::new().app_data(state()).configure(crate::configure)).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: ApiHealth = test::call_and_read_body_json(&app, req).await;
        assert!(body.healthy);
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn proxy_requires_address_or_location() {
        let app =
            test::init_service(App::new().app_data(state()).configure(crate::configure)).await;

        for uri in ["/api/parcel-by-address", "/api/parcel-by-address?lat=37.0", "/api/parcels"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
            let body: ApiError = test::read_body_json(resp).await;
            assert_eq!(body.error, MISSING_QUERY);
        }
    }

    #[actix_web::test]
    async fn proxy_without_credentials_is_server_error() {
        let app =
            test::init_service(App::new().app_data(state()).configure(crate::configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/parcel-by-address?address=1%20Main%20St")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ApiError = test::read_body_json(resp).await;
        assert!(body.error.contains("PRECISELY_API_KEY"));
    }

    #[actix_web::test]
    async fn invalid_coordinates_are_bad_request() {
        let app =
            test::init_service(App::new().app_data(state()).configure(crate::configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/parcels?lat=north&lng=-122")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn select_reorders_by_clicked_point() {
        let app =
            test::init_service(App::new().app_data(state()).configure(crate::configure)).await;
        let candidates = serde_json::json!({
            "type": "FeatureCollection",
            "features": [square(-122.0, 37.0), square(-121.995, 37.0), square(-121.999, 37.0)]
        });

        let req = test::TestRequest::post()
            .uri("/api/parcels/select")
            .set_json(serde_json::json!({
                "candidates": candidates,
                "focus": { "lat": 37.0005, "lng": -121.9985 }
            }))
            .to_request();
        let body: ApiSelection = test::call_and_read_body_json(&app, req).await;

        let order: Vec<usize> = body.parcels.iter().map(|p| p.index).collect();
        assert_eq!(order, vec![2, 0, 1]);
        assert!(body.parcels[0].is_main);
        assert_eq!(body.tier, Some(SelectionTier::Interior));
        assert!(body.main_lot_sq_ft.unwrap() > 0.0);
    }

    #[actix_web::test]
    async fn select_with_malformed_candidates_is_empty() {
        let app =
            test::init_service(App::new().app_data(state()).configure(crate::configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/parcels/select")
            .set_json(serde_json::json!({ "candidates": { "raw": "oops" } }))
            .to_request();
        let body: ApiSelection = test::call_and_read_body_json(&app, req).await;
        assert!(body.parcels.is_empty());
        assert_eq!(body.tier, None);
        assert_eq!(body.main_lot_sq_ft, None);
    }

    #[actix_web::test]
    async fn export_returns_closed_geojson_attachment() {
        let app =
            test::init_service(App::new().app_data(state()).configure(crate::configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/export")
            .set_json(serde_json::json!({
                "shapes": [{
                    "role": "lot",
                    "ring": [
                        { "lat": 37.0, "lng": -122.0 },
                        { "lat": 37.0, "lng": -121.999 },
                        { "lat": 37.001, "lng": -121.999 }
                    ]
                }]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(disposition.contains(EXPORT_FILENAME));

        let body = test::read_body(resp).await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let ring = json["features"][0]["geometry"]["coordinates"][0]
            .as_array()
            .unwrap();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.first(), ring.last());
        assert_eq!(json["features"][0]["properties"]["role"], "lot");
    }
}
