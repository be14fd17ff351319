//! # API Keys
//!
//! Operators provision keys in the config file as digests; the raw key
//! only ever travels in the `api-key` request header.

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

use super::crypto::{hash_api_key, verify_api_key};
use super::errors::{AuthError, AuthResult};

/// Request header carrying the raw key
pub const API_KEY_HEADER: &str = "api-key";

/// A provisioned key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyEntry {
    /// Label used in logs
    pub name: String,

    /// `hash_api_key` digest of the raw key
    pub key_hash: String,

    /// Whether the key may edit permission records
    #[serde(default)]
    pub admin: bool,
}

impl ApiKeyEntry {
    /// Entry for a raw key (hashes it)
    pub fn from_raw(name: impl Into<String>, raw_key: &str, admin: bool) -> Self {
        Self {
            name: name.into(),
            key_hash: hash_api_key(raw_key),
            admin,
        }
    }
}

/// Identity resolved from a valid key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPrincipal {
    pub name: String,
    pub admin: bool,
}

impl ApiPrincipal {
    pub fn require_admin(&self) -> AuthResult<()> {
        if self.admin {
            Ok(())
        } else {
            Err(AuthError::AdminRequired)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApiKeyStore {
    entries: Vec<ApiKeyEntry>,
}

impl ApiKeyStore {
    pub fn new(entries: Vec<ApiKeyEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a raw key.
    ///
    /// Every entry is compared so the time taken does not depend on which
    /// entry matched.
    pub fn authenticate(&self, raw_key: &str) -> AuthResult<ApiPrincipal> {
        if raw_key.is_empty() {
            return Err(AuthError::MissingApiKey);
        }

        let mut found = None;
        for entry in &self.entries {
            if verify_api_key(raw_key, &entry.key_hash) && found.is_none() {
                found = Some(ApiPrincipal {
                    name: entry.name.clone(),
                    admin: entry.admin,
                });
            }
        }
        found.ok_or(AuthError::InvalidApiKey)
    }

    /// Resolve the key carried in request headers
    pub fn authenticate_headers(&self, headers: &HeaderMap) -> AuthResult<ApiPrincipal> {
        let raw_key = headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .ok_or(AuthError::MissingApiKey)?;
        self.authenticate(raw_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn create_store() -> ApiKeyStore {
        ApiKeyStore::new(vec![
            ApiKeyEntry::from_raw("integration", "key-user", false),
            ApiKeyEntry::from_raw("ops", "key-admin", true),
        ])
    }

    #[test]
    fn test_authenticate_known_key() {
        let store = create_store();
        let principal = store.authenticate("key-user").unwrap();
        assert_eq!(principal.name, "integration");
        assert!(!principal.admin);
        assert_eq!(principal.require_admin(), Err(AuthError::AdminRequired));

        assert!(store.authenticate("key-admin").unwrap().require_admin().is_ok());
    }

    #[test]
    fn test_authenticate_unknown_key() {
        let store = create_store();
        assert_eq!(store.authenticate("nope"), Err(AuthError::InvalidApiKey));
        assert_eq!(store.authenticate(""), Err(AuthError::MissingApiKey));
    }

    #[test]
    fn test_authenticate_headers() {
        let store = create_store();
        let mut headers = HeaderMap::new();
        assert_eq!(
            store.authenticate_headers(&headers),
            Err(AuthError::MissingApiKey)
        );

        headers.insert(API_KEY_HEADER, HeaderValue::from_static("key-user"));
        assert!(store.authenticate_headers(&headers).is_ok());
    }
}
