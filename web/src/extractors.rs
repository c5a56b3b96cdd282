//! Authentication extractors.
//!
//! Provides Axum extractors for:
//! - Bearer token extraction from the `Authorization` header
//! - Principal resolution (token verification + fresh user-row lookup)
//! - Role-based access control
//!
//! # Usage
//!
//! ```rust,ignore
//! use ticketline_web::extractors::{AuthUser, RequireAdmin};
//!
//! // Any authenticated caller
//! async fn profile(AuthUser(principal): AuthUser) -> ... {}
//!
//! // Admin role required
//! async fn list_notifications(RequireAdmin(principal): RequireAdmin) -> ... {}
//! ```
//!
//! The user row is re-read on every request, so disabling an account or
//! changing its role takes effect immediately regardless of what the token
//! claims say.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use ticketline_auth::Principal;
use ticketline_core::{Role, UserId};

use crate::error::AppError;
use crate::state::AppState;

/// Bearer token extracted from the `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized("Invalid authorization format. Expected 'Bearer <token>'")
        })?;

        if token.is_empty() {
            return Err(AppError::unauthorized("Empty bearer token"));
        }

        Ok(Self(token.to_string()))
    }
}

/// Authenticated caller.
///
/// Verifies the bearer token and resolves the [`Principal`] against the
/// user store. Use this as a handler parameter to require authentication
/// without a role constraint.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = BearerToken::from_request_parts(parts, state).await?;

        let claims = state.tokens.verify(&bearer.0)?;

        // The token only names the user; enabled flag and role come from
        // storage so revocations are effective immediately.
        let user = state
            .users
            .find_by_id(UserId::from_uuid(claims.sub))
            .await?
            .ok_or_else(|| AppError::unauthorized("Unknown user"))?;

        if !user.enabled {
            return Err(AppError::unauthorized("Account is disabled"));
        }

        Ok(Self(Principal::from(&user)))
    }
}

/// Require the `user` role.
///
/// Booking endpoints are for regular accounts; an admin-only account gets
/// 403 here, mirroring the access rules of the event endpoints in reverse.
#[derive(Debug, Clone)]
pub struct RequireUser(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(principal) = AuthUser::from_request_parts(parts, state).await?;

        if principal.role != Role::User {
            return Err(AppError::forbidden("User role required"));
        }

        Ok(Self(principal))
    }
}

/// Require the admin role.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(principal) = AuthUser::from_request_parts(parts, state).await?;

        if !principal.is_admin() {
            return Err(AppError::forbidden("Admin role required"));
        }

        Ok(Self(principal))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract_bearer(request: Request<()>) -> Result<BearerToken, AppError> {
        let (mut parts, ()) = request.into_parts();
        BearerToken::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn bearer_token_is_extracted() {
        let request = Request::builder()
            .header("authorization", "Bearer abc.def.ghi")
            .body(())
            .unwrap();

        let token = extract_bearer(request).await.expect("Should extract");
        assert_eq!(token.0, "abc.def.ghi");
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let request = Request::builder().body(()).unwrap();
        let err = extract_bearer(request).await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn basic_auth_is_rejected() {
        let request = Request::builder()
            .header("authorization", "Basic dXNlcjpwYXNz")
            .body(())
            .unwrap();

        let err = extract_bearer(request).await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn empty_bearer_is_rejected() {
        let request = Request::builder()
            .header("authorization", "Bearer ")
            .body(())
            .unwrap();

        assert!(extract_bearer(request).await.is_err());
    }
}
