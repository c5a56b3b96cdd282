//! `PostgreSQL` event store.
//!
//! Besides plain CRUD, this module owns the capacity reconciliation that
//! runs when an event is updated. Reconciliation takes the same `FOR
//! UPDATE` row lock as the booking transaction, so a capacity change can
//! never race a concurrent booking into overselling: both writers of
//! `available_seats` serialize on the event row.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use ticketline_core::{
    DomainError, Event, EventId, EventUpdate, NewEvent, Page, Result, page::clamp_page_size,
};
use uuid::Uuid;

/// Row shape shared by every event query.
type EventRow = (
    Uuid,
    String,
    Option<String>,
    DateTime<Utc>,
    i32,
    i32,
    DateTime<Utc>,
    DateTime<Utc>,
);

const SELECT_EVENT: &str = r"
    SELECT id, name, description, event_date, capacity, available_seats, created_at, updated_at
    FROM events
";

/// Sort key for event listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EventSort {
    /// Alphabetical by name
    Name,
    /// Chronological by event date
    EventDate,
    /// Insertion order
    #[default]
    CreatedAt,
}

impl EventSort {
    /// Parse a query-string sort parameter, falling back to the default.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("name") => Self::Name,
            Some("date" | "event_date") => Self::EventDate,
            _ => Self::default(),
        }
    }

    /// Column used in the `ORDER BY` clause. Fixed strings, never caller
    /// input, so interpolation into the query is safe.
    const fn as_column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::EventDate => "event_date",
            Self::CreatedAt => "created_at",
        }
    }
}

/// Persistent storage for events.
#[derive(Clone)]
pub struct EventStore {
    pool: PgPool,
}

impl EventStore {
    /// Create a new event store over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new event. `available_seats` starts equal to `capacity`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidCapacity`] for negative capacity,
    /// [`DomainError::Database`] on storage failure.
    #[tracing::instrument(skip(self, new_event), fields(name = %new_event.name))]
    pub async fn create(&self, new_event: NewEvent) -> Result<Event> {
        if new_event.capacity < 0 {
            return Err(DomainError::InvalidCapacity(new_event.capacity));
        }

        let now = Utc::now();
        let event = Event {
            id: EventId::new(),
            name: new_event.name,
            description: new_event.description,
            event_date: new_event.event_date,
            capacity: new_event.capacity,
            available_seats: new_event.capacity,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r"
            INSERT INTO events
                (id, name, description, event_date, capacity, available_seats, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(event.id.as_uuid())
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.event_date)
        .bind(event.capacity)
        .bind(event.available_seats)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database(format!("Failed to create event: {e}")))?;

        tracing::info!(event_id = %event.id, capacity = event.capacity, "Event created");

        Ok(event)
    }

    /// Fetch an event by id.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EventNotFound`] when absent,
    /// [`DomainError::Database`] on storage failure.
    pub async fn get(&self, id: EventId) -> Result<Event> {
        let row: Option<EventRow> = sqlx::query_as(&format!("{SELECT_EVENT} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to query event: {e}")))?;

        row.map(row_to_event)
            .ok_or(DomainError::EventNotFound(id))
    }

    /// List events, ascending by the chosen sort key.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Database`] if a query fails.
    pub async fn list(&self, page: u32, size: u32, sort: EventSort) -> Result<Page<Event>> {
        let size = clamp_page_size(size);

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to count events: {e}")))?;

        let rows: Vec<EventRow> = sqlx::query_as(&format!(
            "{SELECT_EVENT} ORDER BY {} ASC, id ASC LIMIT $1 OFFSET $2",
            sort.as_column()
        ))
        .bind(i64::from(size))
        .bind(i64::from(page) * i64::from(size))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Database(format!("Failed to list events: {e}")))?;

        Ok(Page::new(
            rows.into_iter().map(row_to_event).collect(),
            page,
            size,
            total,
        ))
    }

    /// Replace an event's fields, reconciling the seat counter under the
    /// event row's exclusive lock.
    ///
    /// Seats already committed to bookings are preserved: the new
    /// `available_seats` is `new capacity - booked`. Because the row lock
    /// is the same one the booking transaction takes, a concurrent booking
    /// either completes before the reconciliation reads the counters or
    /// waits until after it commits; the decrement can never be lost.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EventNotFound`] when absent,
    /// [`DomainError::InvalidCapacity`] for negative capacity,
    /// [`DomainError::CapacityBelowBooked`] if bookings already exceed the
    /// new capacity, [`DomainError::Database`] on storage failure.
    #[tracing::instrument(skip(self, update))]
    pub async fn update(&self, id: EventId, update: EventUpdate) -> Result<Event> {
        if update.capacity < 0 {
            return Err(DomainError::InvalidCapacity(update.capacity));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::Database(format!("Failed to begin transaction: {e}")))?;

        let row: Option<(i32, i32)> = sqlx::query_as(
            "SELECT capacity, available_seats FROM events WHERE id = $1 FOR UPDATE",
        )
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::Database(format!("Failed to lock event: {e}")))?;

        let Some((capacity, available_seats)) = row else {
            return Err(DomainError::EventNotFound(id));
        };

        let booked = capacity - available_seats;
        let new_available = update.capacity - booked;
        if new_available < 0 {
            return Err(DomainError::CapacityBelowBooked {
                capacity: update.capacity,
                booked,
            });
        }

        let row: EventRow = sqlx::query_as(
            r"
            UPDATE events
            SET name = $2,
                description = $3,
                event_date = $4,
                capacity = $5,
                available_seats = $6,
                updated_at = $7
            WHERE id = $1
            RETURNING id, name, description, event_date, capacity, available_seats,
                      created_at, updated_at
            ",
        )
        .bind(id.as_uuid())
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.event_date)
        .bind(update.capacity)
        .bind(new_available)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DomainError::Database(format!("Failed to update event: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::Database(format!("Failed to commit event update: {e}")))?;

        tracing::info!(event_id = %id, capacity = update.capacity, "Event updated");

        Ok(row_to_event(row))
    }

    /// Delete an event. Returns `false` if no row matched.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Database`] if the delete fails.
    pub async fn delete(&self, id: EventId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to delete event: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_event(
    (id, name, description, event_date, capacity, available_seats, created_at, updated_at): EventRow,
) -> Event {
    Event {
        id: EventId::from_uuid(id),
        name,
        description,
        event_date,
        capacity,
        available_seats,
        created_at,
        updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_param_parsing() {
        assert_eq!(EventSort::from_param(Some("name")), EventSort::Name);
        assert_eq!(EventSort::from_param(Some("date")), EventSort::EventDate);
        assert_eq!(
            EventSort::from_param(Some("event_date")),
            EventSort::EventDate
        );
        assert_eq!(EventSort::from_param(None), EventSort::CreatedAt);
        assert_eq!(
            EventSort::from_param(Some("'; DROP TABLE events;--")),
            EventSort::CreatedAt
        );
    }
}
