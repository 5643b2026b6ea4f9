//! Compile-time embedded endpoint configuration plus env credentials.
//!
//! Endpoint URLs and token timing live in `services/precisely.toml`,
//! embedded via `include_str!`. The API key and secret come from the
//! `PRECISELY_API_KEY` and `PRECISELY_API_SECRET` environment variables.

use serde::Deserialize;

const SERVICE_TOML: &str = include_str!("../services/precisely.toml");

/// Endpoint and timing configuration for the Precisely API.
#[derive(Debug, Clone, Deserialize)]
pub struct PreciselyConfig {
    /// Service identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// OAuth token endpoint.
    pub auth_url: String,
    /// Parcel boundary lookup by address.
    pub by_address_url: String,
    /// Parcel boundary lookup by coordinates.
    pub by_location_url: String,
    /// A cached token is reused only while it has more than this many
    /// seconds left.
    #[serde(default = "default_refresh_margin")]
    pub refresh_margin_secs: i64,
    /// Token lifetime assumed when the auth response omits `expires_in`.
    #[serde(default = "default_expires_in")]
    pub default_expires_in_secs: i64,
    /// Per-request timeout.
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

const fn default_refresh_margin() -> i64 {
    60
}

const fn default_expires_in() -> i64 {
    3000
}

const fn default_timeout() -> u64 {
    20
}

impl PreciselyConfig {
    /// Returns the embedded configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed. It is a compile-time
    /// asset, so this is a development error caught by the tests.
    #[must_use]
    pub fn embedded() -> Self {
        toml::de::from_str(SERVICE_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded Precisely config: {e}"))
    }
}

/// API key and secret for the client-credentials grant.
#[derive(Clone)]
pub struct Credentials {
    /// API key (client id).
    pub api_key: String,
    /// API secret (client secret).
    pub api_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Reads credentials from `PRECISELY_API_KEY` / `PRECISELY_API_SECRET`.
///
/// Returns `Some` only when **both** are set and non-empty.
#[must_use]
pub fn credentials_from_env() -> Option<Credentials> {
    let api_key = std::env::var("PRECISELY_API_KEY").ok()?;
    let api_secret = std::env::var("PRECISELY_API_SECRET").ok()?;
    if api_key.is_empty() || api_secret.is_empty() {
        return None;
    }
    Some(Credentials {
        api_key,
        api_secret,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_embedded_config() {
        let config = PreciselyConfig::embedded();
        assert_eq!(config.id, "precisely");
        assert!(!config.name.is_empty());
        assert_eq!(config.refresh_margin_secs, 60);
        assert_eq!(config.default_expires_in_secs, 3000);
    }

    #[test]
    fn endpoints_are_https() {
        let config = PreciselyConfig::embedded();
        for url in [
            &config.auth_url,
            &config.by_address_url,
            &config.by_location_url,
        ] {
            assert!(url.starts_with("https://"), "Not an https endpoint: {url}");
        }
    }

    #[test]
    fn debug_redacts_secret() {
        let creds = Credentials {
            api_key: "key".to_string(),
            api_secret: "hunter2".to_string(),
        };
        let printed = format!("{creds:?}");
        assert!(printed.contains("key"));
        assert!(!printed.contains("hunter2"));
    }
}
