#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client for the Precisely parcel-boundary API.
//!
//! Authenticates with the OAuth client-credentials grant (HTTP Basic
//! `API_KEY:API_SECRET`, body `grant_type=client_credentials`) and caches
//! the bearer token in memory until shortly before it expires.
//!
//! Parcel lookups go to either the by-address or by-location endpoint.
//! Responses are passed through as-is: the upstream status is kept and a
//! body that is not JSON is wrapped as `{ "raw": "<text>" }`.

pub mod config;
pub mod token;

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;

pub use config::{Credentials, PreciselyConfig, credentials_from_env};
use token::TokenCache;

/// Errors from Precisely API operations.
#[derive(Debug, Error)]
pub enum PreciselyError {
    /// `PRECISELY_API_KEY` or `PRECISELY_API_SECRET` is not set.
    #[error("Missing PRECISELY_API_KEY or PRECISELY_API_SECRET env vars")]
    MissingCredentials,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The token endpoint rejected the credentials.
    #[error("Precisely auth failed: {status} {body}")]
    Auth {
        /// HTTP status returned by the token endpoint.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// A response could not be interpreted.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}

/// What to look up.
#[derive(Debug, Clone, PartialEq)]
pub enum ParcelQuery {
    /// Free-form street address.
    Address(String),
    /// A coordinate inside (or near) the parcel.
    Location {
        /// Latitude (WGS84).
        lat: f64,
        /// Longitude (WGS84).
        lng: f64,
    },
}

impl ParcelQuery {
    /// Builds a query from request parameters. A non-empty address wins
    /// over coordinates; coordinates need both `lat` and `lng`.
    #[must_use]
    pub fn from_params(address: Option<&str>, lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        match (address.map(str::trim).filter(|a| !a.is_empty()), lat, lng) {
            (Some(address), _, _) => Some(Self::Address(address.to_string())),
            (None, Some(lat), Some(lng)) => Some(Self::Location { lat, lng }),
            _ => None,
        }
    }

    /// The coordinate of a location query, as `(lat, lng)`.
    #[must_use]
    pub const fn location(&self) -> Option<(f64, f64)> {
        match self {
            Self::Address(_) => None,
            Self::Location { lat, lng } => Some((*lat, *lng)),
        }
    }

    /// Endpoint URL and query-string parameters for this lookup.
    #[must_use]
    pub fn request_target<'a>(
        &self,
        config: &'a PreciselyConfig,
    ) -> (&'a str, Vec<(&'static str, String)>) {
        match self {
            Self::Address(address) => (
                config.by_address_url.as_str(),
                vec![("address", address.clone())],
            ),
            Self::Location { lat, lng } => (
                config.by_location_url.as_str(),
                vec![("latitude", lat.to_string()), ("longitude", lng.to_string())],
            ),
        }
    }
}

/// An upstream response, passed through to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    /// Upstream HTTP status code.
    pub status: u16,
    /// Parsed JSON body, or `{ "raw": text }` if it was not JSON.
    pub body: serde_json::Value,
}

impl UpstreamResponse {
    /// Wraps a raw response body.
    #[must_use]
    pub fn from_text(status: u16, text: &str) -> Self {
        let body = serde_json::from_str(text)
            .unwrap_or_else(|_| serde_json::json!({ "raw": text }));
        Self { status, body }
    }

    /// Whether the upstream status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

/// Precisely API client. Cheap to share behind an `Arc`; the token cache
/// is internally synchronized.
#[derive(Debug)]
pub struct PreciselyClient {
    http: reqwest::Client,
    config: PreciselyConfig,
    credentials: Option<Credentials>,
    token: Mutex<TokenCache>,
}

impl PreciselyClient {
    /// Creates a client. Missing credentials are only reported when a
    /// token is first needed.
    ///
    /// # Errors
    ///
    /// Returns [`PreciselyError::Http`] if the HTTP client cannot be built.
    pub fn new(
        config: PreciselyConfig,
        credentials: Option<Credentials>,
    ) -> Result<Self, PreciselyError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            config,
            credentials,
            token: Mutex::new(TokenCache::default()),
        })
    }

    /// Creates a client from the embedded config and env credentials.
    ///
    /// # Errors
    ///
    /// Returns [`PreciselyError::Http`] if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, PreciselyError> {
        let credentials = credentials_from_env();
        if credentials.is_none() {
            log::warn!("PRECISELY_API_KEY / PRECISELY_API_SECRET not set; lookups will fail");
        }
        Self::new(PreciselyConfig::embedded(), credentials)
    }

    /// The endpoint configuration in use.
    #[must_use]
    pub const fn config(&self) -> &PreciselyConfig {
        &self.config
    }

    /// Returns a valid bearer token, fetching a new one if the cached
    /// token is missing or about to expire.
    ///
    /// # Errors
    ///
    /// Returns [`PreciselyError`] if credentials are missing, the request
    /// fails, or the token endpoint answers with a non-2xx status.
    pub async fn access_token(&self) -> Result<String, PreciselyError> {
        let mut cache = self.token.lock().await;
        let now = chrono::Utc::now().timestamp();

        if let Some(token) = cache.get(now, self.config.refresh_margin_secs) {
            return Ok(token.to_string());
        }

        let creds = self
            .credentials
            .as_ref()
            .ok_or(PreciselyError::MissingCredentials)?;

        log::debug!("Requesting new Precisely access token");
        let resp = self
            .http
            .post(&self.config.auth_url)
            .basic_auth(&creds.api_key, Some(&creds.api_secret))
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body("grant_type=client_credentials")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PreciselyError::Auth {
                status: status.as_u16(),
                body,
            });
        }

        let data: TokenResponse = resp.json().await.map_err(|e| PreciselyError::Parse {
            message: format!("Invalid token response: {e}"),
        })?;
        let expires_in = data
            .expires_in
            .filter(|v| *v > 0)
            .unwrap_or(self.config.default_expires_in_secs);

        log::info!("Obtained Precisely access token (expires in {expires_in}s)");
        cache.store(data.access_token.clone(), now, expires_in);
        Ok(data.access_token)
    }

    /// Looks up parcel boundaries.
    ///
    /// Non-2xx upstream statuses are returned, not treated as errors.
    ///
    /// # Errors
    ///
    /// Returns [`PreciselyError`] if authentication or the HTTP request
    /// fails.
    pub async fn fetch(&self, query: &ParcelQuery) -> Result<UpstreamResponse, PreciselyError> {
        let token = self.access_token().await?;
        let (url, params) = query.request_target(&self.config);

        log::debug!("Fetching parcel boundaries: {query:?}");
        let resp = self
            .http
            .get(url)
            .query(&params)
            .bearer_auth(token)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let text = resp.text().await?;
        if !(200..300).contains(&status) {
            log::warn!("Precisely returned status {status} for {query:?}");
        }
        self.note_status(status).await;
        Ok(UpstreamResponse::from_text(status, &text))
    }

    /// A 401 means the cached token was revoked early; drop it so the next
    /// lookup authenticates again.
    async fn note_status(&self, status: u16) {
        if status == 401 {
            log::info!("Discarding rejected Precisely access token");
            self.token.lock().await.clear();
        }
    }
}
