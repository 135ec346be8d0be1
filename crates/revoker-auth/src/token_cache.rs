//! Optional cache for client-credentials access tokens.
//!
//! Nothing is cached unless a [`TokenCache`] is injected into the
//! [`CredentialResolver`](crate::CredentialResolver). Entries carry an explicit
//! expiry and are ignored once it passes.

use std::collections::HashMap;
use std::sync::Mutex;

use revoker_core::{current_unix_timestamp, is_expired_unix};

use crate::types::OAuth2ClientCredentialsConfig;

#[derive(Clone, PartialEq, Eq)]
/// An access token plus the Unix second at which it stops being usable.
pub struct CachedToken {
    pub access_token: String,
    pub expires_unix: u64,
}

impl CachedToken {
    pub fn is_expired_at(&self, now_unix: u64) -> bool {
        is_expired_unix(Some(self.expires_unix), now_unix)
    }
}

impl std::fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedToken")
            .field("access_token", &"<redacted>")
            .field("expires_unix", &self.expires_unix)
            .finish()
    }
}

/// Storage seam for exchanged tokens.
pub trait TokenCache: Send + Sync {
    /// Returns a token that has not yet expired.
    fn get(&self, key: &str) -> Option<CachedToken>;
    fn put(&self, key: &str, token: CachedToken);
}

/// Builds the cache key for a client-credentials configuration.
///
/// The client secret is not part of the key.
pub fn token_cache_key(config: &OAuth2ClientCredentialsConfig) -> String {
    format!(
        "{}|{}|{}|{}",
        config.token_url,
        config.client_id,
        config.scope.as_deref().unwrap_or_default(),
        config.audience.as_deref().unwrap_or_default()
    )
}

#[derive(Debug, Default)]
/// Process-local [`TokenCache`] backed by a mutex-guarded map.
pub struct InMemoryTokenCache {
    entries: Mutex<HashMap<String, CachedToken>>,
}

impl InMemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TokenCache for InMemoryTokenCache {
    fn get(&self, key: &str) -> Option<CachedToken> {
        let mut entries = self.entries.lock().ok()?;
        let now = current_unix_timestamp();
        match entries.get(key) {
            Some(token) if !token.is_expired_at(now) => Some(token.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn put(&self, key: &str, token: CachedToken) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), token);
        }
    }
}
