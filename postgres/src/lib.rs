//! `PostgreSQL` persistence for Ticketline.
//!
//! This crate provides the relational stores behind the HTTP layer:
//!
//! - [`UserStore`] — credential rows
//! - [`EventStore`] — event rows, including locked capacity reconciliation
//! - [`BookingStore`] — the booking transaction (the concurrency-sensitive
//!   core of the system) and booking listings
//! - [`NotificationStore`] — post-commit notification log rows
//!
//! All stores are thin wrappers over a shared [`PgPool`] and use
//! runtime-checked queries. The booking transaction takes a row-level
//! exclusive lock on the event's seat counter so that concurrent bookings
//! for the same event are totally ordered; see [`BookingStore::book`].
//!
//! # Example
//!
//! ```ignore
//! use ticketline_postgres::{connect, run_migrations, BookingStore};
//!
//! async fn example() -> ticketline_core::Result<()> {
//!     let pool = connect("postgres://localhost/ticketline", 10).await?;
//!     run_migrations(&pool).await?;
//!     let bookings = BookingStore::new(pool, 3);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use ticketline_core::{DomainError, Result};

pub mod bookings;
pub mod events;
pub mod notifications;
pub mod users;

// Re-export key types for convenience
pub use bookings::BookingStore;
pub use events::{EventSort, EventStore};
pub use notifications::NotificationStore;
pub use users::UserStore;

/// Connect to `PostgreSQL` and build a connection pool.
///
/// # Errors
///
/// Returns [`DomainError::Database`] if the pool cannot be established.
pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
        .map_err(|e| DomainError::Database(format!("Failed to connect to database: {e}")))
}

/// Run the embedded schema migrations.
///
/// # Errors
///
/// Returns [`DomainError::Database`] if a migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DomainError::Database(format!("Migration failed: {e}")))?;
    Ok(())
}

/// Whether a sqlx error is a transient transaction conflict worth retrying.
///
/// `PostgreSQL` signals these with SQLSTATE `40001` (serialization failure)
/// and `40P01` (deadlock detected). Both leave the database unchanged for
/// the failed transaction, so the caller may simply run it again.
#[must_use]
pub fn is_transient_conflict(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if matches!(db.code().as_deref(), Some("40001" | "40P01"))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_not_transient() {
        assert!(!is_transient_conflict(&sqlx::Error::RowNotFound));
        assert!(!is_transient_conflict(&sqlx::Error::PoolTimedOut));
    }
}
