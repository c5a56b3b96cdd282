//! Error types for token and password operations.

use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Failure modes of the token and password primitives.
///
/// Credential mismatches (wrong password, unknown user, disabled account)
/// are domain errors and live in `ticketline_core::DomainError`; this enum
/// only covers the mechanics of tokens and hashes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Bearer token has expired.
    #[error("Token has expired")]
    TokenExpired,

    /// Bearer token failed signature or structural validation.
    #[error("Invalid token")]
    TokenInvalid,

    /// Password hashing or hash parsing failed.
    #[error("Password hashing failed: {0}")]
    Hash(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Self::TokenExpired,
            _ => Self::TokenInvalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_signature_maps_to_token_expired() {
        let err = jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::ExpiredSignature,
        );
        assert_eq!(AuthError::from(err), AuthError::TokenExpired);
    }

    #[test]
    fn other_jwt_errors_map_to_invalid() {
        let err =
            jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidToken);
        assert_eq!(AuthError::from(err), AuthError::TokenInvalid);
    }
}
