//! Registration and login endpoints.
//!
//! - `POST /auth/signup` - Register a new account (public)
//! - `POST /auth/login` - Exchange credentials for a bearer token (public)

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use ticketline_auth::{hash_password, utils, verify_password};
use ticketline_core::{DomainError, Role};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to register a new account.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    /// Desired login name
    pub username: String,
    /// Plaintext password, hashed before storage
    pub password: String,
    /// Requested role; defaults to `user`
    pub role: Option<Role>,
}

/// Response after a successful registration.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    /// The new account's id
    pub id: Uuid,
    /// Registered login name
    pub username: String,
    /// Granted role
    pub role: Role,
    /// Success message
    pub message: String,
}

/// Request to authenticate.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login name
    pub username: String,
    /// Plaintext password
    pub password: String,
}

/// Response carrying the issued bearer token.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Signed bearer token for the `Authorization` header
    pub token: String,
    /// Authenticated login name
    pub username: String,
    /// Authenticated role
    pub role: Role,
}

// ============================================================================
// Handlers
// ============================================================================

/// Register a new account.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/auth/signup \
///   -H "Content-Type: application/json" \
///   -d '{"username": "alice", "password": "correct horse battery"}'
/// ```
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    utils::validate_username(&request.username)?;
    utils::validate_password(&request.password)?;

    let password_hash = hash_password(&request.password)?;
    let role = request.role.unwrap_or(Role::User);

    let user = state
        .users
        .create(&request.username, &password_hash, role)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            id: *user.id.as_uuid(),
            username: user.username,
            role: user.role,
            message: "User registered successfully.".to_string(),
        }),
    ))
}

/// Authenticate and issue a bearer token.
///
/// Fails with 404 for an unknown username and 400 for a wrong password or
/// disabled account, mirroring the distinction the error taxonomy makes
/// between absent entities and rejected credentials.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/auth/login \
///   -H "Content-Type: application/json" \
///   -d '{"username": "alice", "password": "correct horse battery"}'
/// ```
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state
        .users
        .find_by_username(&request.username)
        .await?
        .ok_or(DomainError::UserNotFound)?;

    if !verify_password(&request.password, &user.password_hash)? {
        return Err(DomainError::InvalidCredentials.into());
    }

    if !user.enabled {
        return Err(DomainError::AccountDisabled.into());
    }

    let token = state.tokens.issue(&user)?;

    tracing::info!(user_id = %user.id, username = %user.username, "User logged in");

    Ok(Json(LoginResponse {
        token,
        username: user.username,
        role: user.role,
    }))
}
