//! Token pair storage and the edge-signal mirror.
//!
//! [`TokenStore`] is the single authoritative holder of the current token
//! pair. It writes through an injected [`TokenStorage`] for durability and
//! mirrors "an access token exists" into an injected [`SignalMirror`] in the
//! same logical step as every set/clear. The mirror is derived state for the
//! route gate; it can be briefly stale across contexts but never permanently
//! divergent.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

use crate::traits::{SignalMirror, TokenStorage};

/// Fallback access-token lifetime in seconds, used when the JWT `exp` claim
/// cannot be decoded.
pub const DEFAULT_ACCESS_LIFETIME_SECS: i64 = 300;

/// An access/refresh token pair.
///
/// All-or-nothing: a pair with either token missing is never constructed;
/// absence is modeled as `Option<TokenPair>` in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived credential presented on each API call.
    pub access: String,
    /// Long-lived credential exchanged for a new access token.
    pub refresh: String,
    /// Access token expiry as a Unix timestamp (seconds).
    pub access_expires_at: i64,
}

impl TokenPair {
    /// Build a pair from a token grant, decoding expiry from the access
    /// token's `exp` claim with a default-lifetime fallback.
    pub fn from_grant(access: String, refresh: String) -> Self {
        let access_expires_at = jwt_expires_at(&access)
            .unwrap_or_else(|| chrono::Utc::now().timestamp() + DEFAULT_ACCESS_LIFETIME_SECS);
        Self {
            access,
            refresh,
            access_expires_at,
        }
    }

    /// Check if the access token is expired.
    pub fn is_access_expired(&self) -> bool {
        chrono::Utc::now().timestamp() >= self.access_expires_at
    }
}

/// JWT claims for extracting expiration time.
#[derive(Deserialize)]
struct JwtClaims {
    exp: i64,
}

/// Extract the absolute expiration timestamp from a JWT access token.
///
/// Returns `None` if the token cannot be parsed.
pub fn jwt_expires_at(access_token: &str) -> Option<i64> {
    let parts: Vec<&str> = access_token.split('.').collect();
    let payload = URL_SAFE_NO_PAD.decode(parts.get(1)?).ok()?;
    let claims: JwtClaims = serde_json::from_slice(&payload).ok()?;
    Some(claims.exp)
}

/// Authoritative holder of the current token pair.
///
/// In-memory state behind a lock, persisted through [`TokenStorage`] and
/// mirrored into a [`SignalMirror`]. Only the session store and the request
/// pipeline mutate it, through `set`/`clear`.
pub struct TokenStore {
    current: RwLock<Option<TokenPair>>,
    storage: Arc<dyn TokenStorage>,
    mirror: Arc<dyn SignalMirror>,
}

impl TokenStore {
    /// Create an empty store over the given storage and mirror.
    pub fn new(storage: Arc<dyn TokenStorage>, mirror: Arc<dyn SignalMirror>) -> Self {
        Self {
            current: RwLock::new(None),
            storage,
            mirror,
        }
    }

    /// Restore a persisted pair into memory (process-start analogue of a
    /// page reload). Aligns the mirror with whatever was found.
    pub async fn load(&self) {
        match self.storage.load().await {
            Ok(Some(pair)) => {
                debug!("restored persisted token pair");
                *self.current.write().unwrap() = Some(pair);
                self.mirror.set_present();
            }
            Ok(None) => {
                self.mirror.clear();
            }
            Err(err) => {
                warn!("failed to load persisted tokens: {}", err);
                self.mirror.clear();
            }
        }
    }

    /// Store a new pair: memory, mirror, and durable storage in one logical
    /// step. A storage write failure is logged and does not fail the set;
    /// the in-memory pair and mirror stay consistent with each other.
    pub async fn set(&self, pair: TokenPair) {
        *self.current.write().unwrap() = Some(pair.clone());
        self.mirror.set_present();
        if let Err(err) = self.storage.save(&pair).await {
            warn!("failed to persist token pair: {}", err);
        }
    }

    /// Clear the pair. Idempotent: clearing an empty store is a no-op
    /// success, and the mirror is always driven to absent.
    pub async fn clear(&self) {
        let had_tokens = self.current.write().unwrap().take().is_some();
        self.mirror.clear();
        if let Err(err) = self.storage.clear().await {
            warn!("failed to clear persisted tokens: {}", err);
        }
        if had_tokens {
            debug!("token pair cleared");
        }
    }

    /// Read the current pair, if any.
    pub fn read(&self) -> Option<TokenPair> {
        self.current.read().unwrap().clone()
    }

    /// Get the current access token, if any.
    pub fn access_token(&self) -> Option<String> {
        self.current.read().unwrap().as_ref().map(|p| p.access.clone())
    }

    /// Get the current refresh token, if any.
    pub fn refresh_token(&self) -> Option<String> {
        self.current
            .read()
            .unwrap()
            .as_ref()
            .map(|p| p.refresh.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemorySignalMirror, InMemoryTokenStorage};

    fn encode_jwt_with_exp(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{}}}"#, exp));
        let signature = URL_SAFE_NO_PAD.encode("fake-signature");
        format!("{}.{}.{}", header, payload, signature)
    }

    fn store_with_mirror() -> (TokenStore, Arc<InMemorySignalMirror>) {
        let mirror = Arc::new(InMemorySignalMirror::new());
        let store = TokenStore::new(
            Arc::new(InMemoryTokenStorage::new()),
            mirror.clone(),
        );
        (store, mirror)
    }

    fn test_pair() -> TokenPair {
        TokenPair {
            access: "access-token".to_string(),
            refresh: "refresh-token".to_string(),
            access_expires_at: chrono::Utc::now().timestamp() + 3600,
        }
    }

    #[test]
    fn test_jwt_expires_at_valid_token() {
        let exp = chrono::Utc::now().timestamp() + 3600;
        let token = encode_jwt_with_exp(exp);
        assert_eq!(jwt_expires_at(&token), Some(exp));
    }

    #[test]
    fn test_jwt_expires_at_invalid_token() {
        assert!(jwt_expires_at("not-a-jwt").is_none());
        assert!(jwt_expires_at("only.two").is_none());
        assert!(jwt_expires_at("").is_none());
        assert!(jwt_expires_at("header.!!!bad-base64!!!.sig").is_none());
    }

    #[test]
    fn test_jwt_expires_at_missing_exp_claim() {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"user123"}"#);
        let token = format!("{}.{}.sig", header, payload);
        assert!(jwt_expires_at(&token).is_none());
    }

    #[test]
    fn test_from_grant_decodes_expiry() {
        let exp = chrono::Utc::now().timestamp() + 1800;
        let access = encode_jwt_with_exp(exp);
        let pair = TokenPair::from_grant(access, "refresh".to_string());
        assert_eq!(pair.access_expires_at, exp);
        assert!(!pair.is_access_expired());
    }

    #[test]
    fn test_from_grant_falls_back_on_opaque_token() {
        let before = chrono::Utc::now().timestamp();
        let pair = TokenPair::from_grant("opaque".to_string(), "refresh".to_string());
        assert!(pair.access_expires_at >= before + DEFAULT_ACCESS_LIFETIME_SECS);
    }

    #[test]
    fn test_is_access_expired() {
        let mut pair = test_pair();
        assert!(!pair.is_access_expired());
        pair.access_expires_at = 0;
        assert!(pair.is_access_expired());
    }

    #[tokio::test]
    async fn test_set_updates_memory_and_mirror() {
        let (store, mirror) = store_with_mirror();
        assert!(store.read().is_none());
        assert!(!mirror.is_present());

        store.set(test_pair()).await;
        assert_eq!(store.access_token(), Some("access-token".to_string()));
        assert_eq!(store.refresh_token(), Some("refresh-token".to_string()));
        assert!(mirror.is_present());
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let (store, mirror) = store_with_mirror();
        store.set(test_pair()).await;

        store.clear().await;
        assert!(store.read().is_none());
        assert!(!mirror.is_present());

        // Second clear on an empty store: still a success, mirror stays absent.
        store.clear().await;
        assert!(store.read().is_none());
        assert!(!mirror.is_present());
    }

    #[tokio::test]
    async fn test_load_restores_persisted_pair() {
        let storage = Arc::new(InMemoryTokenStorage::new());
        let mirror = Arc::new(InMemorySignalMirror::new());

        let first = TokenStore::new(storage.clone(), mirror.clone());
        first.set(test_pair()).await;

        // A fresh store over the same storage restores the pair on load.
        let second = TokenStore::new(storage, mirror.clone());
        assert!(second.read().is_none());
        second.load().await;
        assert_eq!(second.read(), Some(test_pair()));
        assert!(mirror.is_present());
    }

    #[tokio::test]
    async fn test_load_with_empty_storage_clears_mirror() {
        let (store, mirror) = store_with_mirror();
        mirror.set_present(); // stale marker from a previous process
        store.load().await;
        assert!(!mirror.is_present());
    }
}
