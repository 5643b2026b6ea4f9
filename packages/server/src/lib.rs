#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the lot-measure tool.
//!
//! Proxies parcel-boundary lookups to Precisely (keeping the API secret
//! server-side), resolves the main parcel among the returned candidates,
//! re-runs the selection for click-to-correct, and turns drawn shapes into
//! a downloadable `GeoJSON` file.

mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, http::header, middleware, web};
use lot_measure_precisely::PreciselyClient;
use lot_measure_server_models::ApiError;

/// Shared application state.
pub struct AppState {
    /// Parcel-boundary API client (holds the cached bearer token).
    pub precisely: Arc<PreciselyClient>,
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(query_config()).app_data(json_config()).service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route(
                "/parcel-by-address",
                web::get().to(handlers::parcel_by_address),
            )
            .route("/parcels", web::get().to(handlers::parcels))
            .route("/parcels/select", web::post().to(handlers::select_parcels))
            .route("/export", web::post().to(handlers::export)),
    );
}

/// Browser clients call the API cross-origin.
#[must_use]
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600)
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let body = ApiError::new(err.to_string());
        actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body))
            .into()
    })
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let body = ApiError::new(err.to_string());
        actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body))
            .into()
    })
}

/// Starts the lot-measure API server.
///
/// Reads `BIND_ADDR` (default `127.0.0.1`) and `PORT` (default `8080`)
/// and Precisely credentials from the environment. The caller provides
/// the async runtime (e.g. via `#[actix_web::main]`) and initializes
/// logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP client cannot be built,
/// or if the server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    let precisely = PreciselyClient::from_env().map_err(std::io::Error::other)?;
    let state = web::Data::new(AppState {
        precisely: Arc::new(precisely),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(cors())
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
