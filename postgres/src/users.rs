//! `PostgreSQL` user store.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use ticketline_core::{DomainError, Result, Role, User, UserId};
use uuid::Uuid;

/// Row shape shared by every user query.
type UserRow = (Uuid, String, String, String, bool, DateTime<Utc>);

/// Persistent storage for user accounts.
#[derive(Clone)]
pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    /// Create a new user store over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UsernameTaken`] if the username is already
    /// registered, [`DomainError::Database`] on any other failure.
    #[tracing::instrument(skip(self, password_hash))]
    pub async fn create(&self, username: &str, password_hash: &str, role: Role) -> Result<User> {
        let user = User {
            id: UserId::new(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            role,
            enabled: true,
            created_at: Utc::now(),
        };

        sqlx::query(
            r"
            INSERT INTO users (id, username, password_hash, role, enabled, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(user.id.as_uuid())
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.enabled)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return DomainError::UsernameTaken(username.to_string());
                }
            }
            DomainError::Database(format!("Failed to create user: {e}"))
        })?;

        tracing::info!(user_id = %user.id, username = %user.username, role = %user.role, "User registered");

        Ok(user)
    }

    /// Look up a user by login name.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Database`] if the query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r"
            SELECT id, username, password_hash, role, enabled, created_at
            FROM users
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Database(format!("Failed to query user: {e}")))?;

        row.map(row_to_user).transpose()
    }

    /// Look up a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Database`] if the query fails.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r"
            SELECT id, username, password_hash, role, enabled, created_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Database(format!("Failed to query user: {e}")))?;

        row.map(row_to_user).transpose()
    }
}

fn row_to_user((id, username, password_hash, role, enabled, created_at): UserRow) -> Result<User> {
    Ok(User {
        id: UserId::from_uuid(id),
        username,
        password_hash,
        role: Role::parse(&role)?,
        enabled,
        created_at,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    #[test]
    fn row_mapping_parses_role() {
        let row: UserRow = (
            Uuid::new_v4(),
            "alice".to_string(),
            "$argon2id$x".to_string(),
            "admin".to_string(),
            true,
            Utc::now(),
        );
        let user = row_to_user(row).unwrap();
        assert_eq!(user.role, Role::Admin);
        assert!(user.enabled);
    }

    #[test]
    fn row_mapping_rejects_unknown_role() {
        let row: UserRow = (
            Uuid::new_v4(),
            "alice".to_string(),
            String::new(),
            "root".to_string(),
            true,
            Utc::now(),
        );
        assert!(row_to_user(row).is_err());
    }
}
