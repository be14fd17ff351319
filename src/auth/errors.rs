//! # Auth Errors
//!
//! Error types for API-key authentication.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication and authorization errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No key presented
    #[error("API key required")]
    MissingApiKey,

    /// Key presented but not recognised (generic - don't leak which part failed)
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Valid key without administrator rights
    #[error("Administrator API key required")]
    AdminRequired,
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MissingApiKey => 401,
            AuthError::InvalidApiKey => 401,
            AuthError::AdminRequired => 403,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AuthError::MissingApiKey.status_code(), 401);
        assert_eq!(AuthError::InvalidApiKey.status_code(), 401);
        assert_eq!(AuthError::AdminRequired.status_code(), 403);
    }
}
