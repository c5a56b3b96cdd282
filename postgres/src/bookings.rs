//! The booking transaction and booking listings.
//!
//! This is the concurrency-sensitive core of the system. Booking a ticket
//! is a read-check-decrement on one event's seat counter; under concurrent
//! requests for the same event the outcome must be equivalent to running
//! them one at a time. [`BookingStore::book`] achieves that with a
//! row-level exclusive lock (`SELECT ... FOR UPDATE`) held for the life of
//! the transaction:
//!
//! 1. lock the event row and read `available_seats`
//! 2. reject with insufficient-seats if the request doesn't fit
//! 3. insert the booking row and decrement the counter
//! 4. commit
//!
//! The lock totally orders steps 1-4 per event, so the sum of committed
//! tickets can never exceed capacity and no booking is silently lost.
//! Transient conflicts (serialization failures, deadlocks between distinct
//! events' lock acquisition) are retried with a linear backoff; exhausting
//! the budget surfaces [`DomainError::ConcurrencyConflict`], which callers
//! can distinguish from capacity exhaustion and retry.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::time::Duration;
use ticketline_core::{
    Booking, BookingId, DomainError, EventId, Page, Result, UserId, page::clamp_page_size,
};
use uuid::Uuid;

use crate::is_transient_conflict;

/// Base delay between booking retries; grows linearly with the attempt.
const RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// Row shape shared by every booking query.
type BookingRow = (Uuid, Uuid, Uuid, DateTime<Utc>, i32);

/// Outcome of a single booking transaction attempt.
///
/// Transient failures keep the underlying sqlx error so the retry loop can
/// log it; domain failures are final and propagate unchanged.
enum AttemptError {
    Domain(DomainError),
    Transient(sqlx::Error),
}

/// Persistent storage for bookings, including the booking transaction.
#[derive(Clone)]
pub struct BookingStore {
    pool: PgPool,
    max_retries: u32,
}

impl BookingStore {
    /// Create a new booking store.
    ///
    /// `max_retries` bounds how many times a transient transaction conflict
    /// is retried before the booking fails with
    /// [`DomainError::ConcurrencyConflict`].
    #[must_use]
    pub const fn new(pool: PgPool, max_retries: u32) -> Self {
        Self { pool, max_retries }
    }

    /// Atomically book `tickets_count` seats on an event for a user.
    ///
    /// On success the booking row exists, the event's `available_seats` is
    /// decremented by `tickets_count`, and both were committed as one
    /// transaction. On any failure nothing was mutated.
    ///
    /// This method does not dispatch the post-commit notification; that is
    /// the caller's job precisely because it must only happen once the
    /// commit is durably observed.
    ///
    /// # Errors
    ///
    /// - [`DomainError::InvalidTicketCount`] for a non-positive count
    /// - [`DomainError::EventNotFound`] if the event does not exist
    /// - [`DomainError::InsufficientSeats`] if the request doesn't fit
    /// - [`DomainError::ConcurrencyConflict`] after the retry budget
    /// - [`DomainError::Database`] for any other storage failure
    #[tracing::instrument(skip(self), fields(event_id = %event_id, tickets = tickets_count))]
    pub async fn book(
        &self,
        event_id: EventId,
        tickets_count: i32,
        user_id: UserId,
    ) -> Result<Booking> {
        if tickets_count <= 0 {
            return Err(DomainError::InvalidTicketCount(tickets_count));
        }

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.try_book(event_id, tickets_count, user_id).await {
                Ok(booking) => {
                    metrics::counter!("bookings.committed").increment(1);
                    tracing::info!(
                        booking_id = %booking.id,
                        user_id = %user_id,
                        attempt,
                        "Booking committed"
                    );
                    return Ok(booking);
                }
                Err(AttemptError::Transient(e)) if attempt <= self.max_retries => {
                    metrics::counter!("bookings.retried").increment(1);
                    tracing::warn!(
                        attempt,
                        error = %e,
                        "Transient conflict while booking, retrying"
                    );
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                Err(AttemptError::Transient(e)) => {
                    metrics::counter!("bookings.conflict_exhausted").increment(1);
                    tracing::warn!(
                        attempts = attempt,
                        error = %e,
                        "Booking retry budget exhausted"
                    );
                    return Err(DomainError::ConcurrencyConflict { attempts: attempt });
                }
                Err(AttemptError::Domain(e)) => return Err(e),
            }
        }
    }

    /// One transaction attempt. Dropping the transaction on any early
    /// return rolls it back, so a failed attempt leaves no partial state.
    async fn try_book(
        &self,
        event_id: EventId,
        tickets_count: i32,
        user_id: UserId,
    ) -> std::result::Result<Booking, AttemptError> {
        let classify = |e: sqlx::Error| {
            if is_transient_conflict(&e) {
                AttemptError::Transient(e)
            } else {
                AttemptError::Domain(DomainError::Database(format!("Failed to book tickets: {e}")))
            }
        };

        let mut tx = self.pool.begin().await.map_err(classify)?;

        // Exclusive lock on the seat counter for the rest of the transaction.
        let row: Option<(i32,)> =
            sqlx::query_as("SELECT available_seats FROM events WHERE id = $1 FOR UPDATE")
                .bind(event_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(classify)?;

        let Some((available,)) = row else {
            return Err(AttemptError::Domain(DomainError::EventNotFound(event_id)));
        };

        if available < tickets_count {
            metrics::counter!("bookings.rejected_capacity").increment(1);
            return Err(AttemptError::Domain(DomainError::InsufficientSeats {
                requested: tickets_count,
                available,
            }));
        }

        let booking = Booking {
            id: BookingId::new(),
            user_id,
            event_id,
            booking_date: Utc::now(),
            tickets_count,
        };

        sqlx::query(
            r"
            INSERT INTO bookings (id, user_id, event_id, booking_date, tickets_count)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(booking.id.as_uuid())
        .bind(booking.user_id.as_uuid())
        .bind(booking.event_id.as_uuid())
        .bind(booking.booking_date)
        .bind(booking.tickets_count)
        .execute(&mut *tx)
        .await
        .map_err(classify)?;

        sqlx::query("UPDATE events SET available_seats = available_seats - $2 WHERE id = $1")
            .bind(event_id.as_uuid())
            .bind(tickets_count)
            .execute(&mut *tx)
            .await
            .map_err(classify)?;

        tx.commit().await.map_err(classify)?;

        Ok(booking)
    }

    /// List bookings in creation order (oldest first).
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Database`] if a query fails.
    pub async fn list(&self, page: u32, size: u32) -> Result<Page<Booking>> {
        let size = clamp_page_size(size);

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to count bookings: {e}")))?;

        let rows: Vec<BookingRow> = sqlx::query_as(
            r"
            SELECT id, user_id, event_id, booking_date, tickets_count
            FROM bookings
            ORDER BY booking_date ASC, id ASC
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(i64::from(size))
        .bind(i64::from(page) * i64::from(size))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Database(format!("Failed to list bookings: {e}")))?;

        Ok(Page::new(
            rows.into_iter().map(row_to_booking).collect(),
            page,
            size,
            total,
        ))
    }
}

fn row_to_booking((id, user_id, event_id, booking_date, tickets_count): BookingRow) -> Booking {
    Booking {
        id: BookingId::from_uuid(id),
        user_id: UserId::from_uuid(user_id),
        event_id: EventId::from_uuid(event_id),
        booking_date,
        tickets_count,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    #[test]
    fn row_mapping() {
        let id = Uuid::new_v4();
        let user = Uuid::new_v4();
        let event = Uuid::new_v4();
        let now = Utc::now();
        let booking = row_to_booking((id, user, event, now, 4));
        assert_eq!(booking.id, BookingId::from_uuid(id));
        assert_eq!(booking.user_id, UserId::from_uuid(user));
        assert_eq!(booking.event_id, EventId::from_uuid(event));
        assert_eq!(booking.tickets_count, 4);
    }
}
