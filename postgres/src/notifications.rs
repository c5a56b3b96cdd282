//! `PostgreSQL` notification log store.
//!
//! Rows here are written exclusively by the notification dispatcher, after
//! the owning booking's transaction has committed. A failed insert is the
//! dispatcher's problem to log; it never reaches a booking caller.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use ticketline_core::{
    BookingId, DomainError, NotificationId, NotificationLog, Page, Result,
    page::clamp_page_size,
};
use uuid::Uuid;

/// Row shape shared by every notification query.
type NotificationRow = (Uuid, Uuid, String, DateTime<Utc>);

/// Persistent storage for notification log entries.
#[derive(Clone)]
pub struct NotificationStore {
    pool: PgPool,
}

impl NotificationStore {
    /// Create a new notification store over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a notification log entry for a committed booking.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Database`] if the insert fails.
    #[tracing::instrument(skip(self, message))]
    pub async fn insert(&self, booking_id: BookingId, message: &str) -> Result<NotificationLog> {
        let log = NotificationLog {
            id: NotificationId::new(),
            booking_id,
            message: message.to_string(),
            notified_at: Utc::now(),
        };

        sqlx::query(
            r"
            INSERT INTO notification_logs (id, booking_id, message, notified_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(log.id.as_uuid())
        .bind(log.booking_id.as_uuid())
        .bind(&log.message)
        .bind(log.notified_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database(format!("Failed to insert notification log: {e}")))?;

        tracing::info!(
            notification_id = %log.id,
            booking_id = %booking_id,
            "Notification logged"
        );

        Ok(log)
    }

    /// List notification logs in dispatch order (oldest first).
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Database`] if a query fails.
    pub async fn list(&self, page: u32, size: u32) -> Result<Page<NotificationLog>> {
        let size = clamp_page_size(size);

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notification_logs")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to count notifications: {e}")))?;

        let rows: Vec<NotificationRow> = sqlx::query_as(
            r"
            SELECT id, booking_id, message, notified_at
            FROM notification_logs
            ORDER BY notified_at ASC, id ASC
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(i64::from(size))
        .bind(i64::from(page) * i64::from(size))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Database(format!("Failed to list notifications: {e}")))?;

        Ok(Page::new(
            rows.into_iter().map(row_to_notification).collect(),
            page,
            size,
            total,
        ))
    }

    /// Count log entries referencing one booking. Used by tests to assert
    /// the one-log-per-booking property.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Database`] if the query fails.
    pub async fn count_for_booking(&self, booking_id: BookingId) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM notification_logs WHERE booking_id = $1")
                .bind(booking_id.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::Database(format!("Failed to count notifications: {e}"))
                })?;

        Ok(count)
    }
}

fn row_to_notification((id, booking_id, message, notified_at): NotificationRow) -> NotificationLog {
    NotificationLog {
        id: NotificationId::from_uuid(id),
        booking_id: BookingId::from_uuid(booking_id),
        message,
        notified_at,
    }
}
