//! # Auth Module
//!
//! API-key authentication for the gateway and its admin routes.

pub mod api_key;
pub mod crypto;
pub mod errors;

pub use api_key::{ApiKeyEntry, ApiKeyStore, ApiPrincipal, API_KEY_HEADER};
pub use crypto::{hash_api_key, verify_api_key};
pub use errors::{AuthError, AuthResult};
