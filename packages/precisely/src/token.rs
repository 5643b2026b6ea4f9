//! Bearer token cache.

/// Most recently issued access token and its expiry (Unix seconds).
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    token: Option<String>,
    expires_at: i64,
}

impl TokenCache {
    /// Returns the cached token if it stays valid for more than
    /// `margin_secs` past `now`.
    #[must_use]
    pub fn get(&self, now: i64, margin_secs: i64) -> Option<&str> {
        self.token
            .as_deref()
            .filter(|_| self.expires_at - margin_secs > now)
    }

    /// Stores a freshly issued token valid for `expires_in` seconds.
    pub fn store(&mut self, token: String, now: i64, expires_in: i64) {
        self.token = Some(token);
        self.expires_at = now + expires_in;
    }

    /// Forgets the cached token.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
