//! # Key Digests
//!
//! Raw API keys never reach the config file or memory tables; only their
//! SHA-256 digest does.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Digest of a raw API key as written in the config file
/// (URL-safe base64, no padding).
pub fn hash_api_key(raw_key: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(raw_key.as_bytes()))
}

/// Whether `raw_key` hashes to `stored_digest`, compared in constant time
pub fn verify_api_key(raw_key: &str, stored_digest: &str) -> bool {
    let digest = hash_api_key(raw_key);
    digest.as_bytes().ct_eq(stored_digest.as_bytes()).into()
}
