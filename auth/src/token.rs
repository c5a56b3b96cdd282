//! Bearer-token issue and verification.
//!
//! Tokens are HS256 JWTs carrying the user id, username and role. The role
//! claim is informational; authorization re-reads the user row on every
//! request, so a stale claim can never widen access.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use ticketline_core::{Role, User};
use uuid::Uuid;

use crate::error::Result;

/// Claims embedded in every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id
    pub sub: Uuid,
    /// Username at issue time
    pub username: String,
    /// Role at issue time
    pub role: Role,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Expiry, seconds since epoch
    pub exp: i64,
}

/// Issues and verifies bearer tokens for a single shared secret.
///
/// # Example
///
/// ```ignore
/// let tokens = TokenManager::new("secret", chrono::Duration::hours(24));
/// let token = tokens.issue(&user)?;
/// let claims = tokens.verify(&token)?;
/// assert_eq!(claims.sub, *user.id.as_uuid());
/// ```
#[derive(Clone)]
pub struct TokenManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenManager {
    /// Create a manager from the shared HS256 secret and token lifetime.
    #[must_use]
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issue a signed token for the given user.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::TokenInvalid`] if encoding fails, which
    /// with an HS256 secret only happens on serialization failure.
    pub fn issue(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: *user.id.as_uuid(),
            username: user.username.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding,
        )?)
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::TokenExpired`] for expired tokens and
    /// [`crate::AuthError::TokenInvalid`] for any other validation failure
    /// (bad signature, malformed token, wrong algorithm).
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::error::AuthError;
    use ticketline_core::UserId;

    fn test_user(role: Role) -> User {
        User {
            id: UserId::new(),
            username: "alice".to_string(),
            password_hash: "$argon2id$irrelevant".to_string(),
            role,
            enabled: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issue_and_verify_roundtrip() {
        let tokens = TokenManager::new("test-secret", Duration::hours(1));
        let user = test_user(Role::Admin);

        let token = tokens.issue(&user).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.sub, *user.id.as_uuid());
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        // Expiry two hours in the past is safely beyond the default leeway.
        let tokens = TokenManager::new("test-secret", Duration::hours(-2));
        let token = tokens.issue(&test_user(Role::User)).unwrap();

        assert_eq!(tokens.verify(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issuer = TokenManager::new("secret-a", Duration::hours(1));
        let verifier = TokenManager::new("secret-b", Duration::hours(1));
        let token = issuer.issue(&test_user(Role::User)).unwrap();

        assert_eq!(verifier.verify(&token), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let tokens = TokenManager::new("test-secret", Duration::hours(1));
        assert_eq!(
            tokens.verify("not.a.token"),
            Err(AuthError::TokenInvalid)
        );
    }
}
