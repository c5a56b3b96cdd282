//! Domain types for the Ticketline booking system.
//!
//! This module contains all value objects and entities: identifier newtypes,
//! the user role, and the persisted shapes of users, events, bookings and
//! notification logs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::DomainError;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a user account
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random `UserId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `UserId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random `EventId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `EventId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a booking
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(Uuid);

impl BookingId {
    /// Creates a new random `BookingId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `BookingId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a notification log entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Creates a new random `NotificationId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `NotificationId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Roles
// ============================================================================

/// Role attached to a user account.
///
/// Determines which endpoints the account may call: booking endpoints
/// require [`Role::User`], event mutation and notification listing require
/// [`Role::Admin`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account, may book tickets and list bookings
    User,
    /// Administrative account, may manage events and read notification logs
    Admin,
}

impl Role {
    /// Convert the role to its database string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Parse a role from its database string representation.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Database`] if the string doesn't match a known
    /// role; an unknown role in storage means the row is corrupt.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(DomainError::Database(format!("Invalid role: {s}"))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A registered user account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Account identifier
    pub id: UserId,
    /// Unique login name
    pub username: String,
    /// Argon2id PHC-format password hash; never serialized out
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Account role
    pub role: Role,
    /// Disabled accounts cannot authenticate
    pub enabled: bool,
    /// Registration timestamp
    pub created_at: DateTime<Utc>,
}

/// A bookable event with a fixed capacity and a live seat counter.
///
/// Invariant: `0 <= available_seats <= capacity` at all times, including
/// under concurrent bookings. `available_seats` is only ever written inside
/// the booking and event-update transactions, which both hold the event
/// row's exclusive lock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event identifier
    pub id: EventId,
    /// Display name
    pub name: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// When the event takes place
    pub event_date: DateTime<Utc>,
    /// Total number of seats
    pub capacity: i32,
    /// Seats still available for booking
    pub available_seats: i32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Number of seats already taken by committed bookings.
    #[must_use]
    pub const fn booked_seats(&self) -> i32 {
        self.capacity - self.available_seats
    }
}

/// Fields required to create a new event.
#[derive(Clone, Debug, Deserialize)]
pub struct NewEvent {
    /// Display name
    pub name: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// When the event takes place
    pub event_date: DateTime<Utc>,
    /// Total number of seats; `available_seats` starts equal to this
    pub capacity: i32,
}

/// Full replacement payload for an event update.
///
/// Capacity changes are reconciled against seats already booked inside the
/// update transaction; see `EventStore::update`.
#[derive(Clone, Debug, Deserialize)]
pub struct EventUpdate {
    /// New display name
    pub name: String,
    /// New description
    pub description: Option<String>,
    /// New event date
    pub event_date: DateTime<Utc>,
    /// New total capacity
    pub capacity: i32,
}

/// A confirmed reservation of seats against one event by one user.
///
/// Bookings are immutable once created; there is no update or cancel
/// operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Booking identifier
    pub id: BookingId,
    /// The user who booked
    pub user_id: UserId,
    /// The event booked against
    pub event_id: EventId,
    /// When the booking was committed
    pub booking_date: DateTime<Utc>,
    /// Number of seats reserved, always positive
    pub tickets_count: i32,
}

/// An audit record written after a booking's transaction has committed.
///
/// Created by the notification dispatcher, never inside the booking
/// transaction; exactly one per successful booking by construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotificationLog {
    /// Log entry identifier
    pub id: NotificationId,
    /// The booking this notification refers to
    pub booking_id: BookingId,
    /// Human-readable notification message
    pub message: String,
    /// When the notification was dispatched
    pub notified_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    #[test]
    fn role_roundtrip() {
        for role in &[Role::User, Role::Admin] {
            let s = role.as_str();
            let parsed = Role::parse(s).expect("valid role should parse");
            assert_eq!(*role, parsed);
        }
    }

    #[test]
    fn role_invalid() {
        assert!(Role::parse("superuser").is_err());
    }

    #[test]
    fn role_serde_is_lowercase() {
        let json = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(json, "\"admin\"");
        let back: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(back, Role::User);
    }

    #[test]
    fn event_booked_seats() {
        let now = Utc::now();
        let event = Event {
            id: EventId::new(),
            name: "Concert".to_string(),
            description: None,
            event_date: now,
            capacity: 100,
            available_seats: 98,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(event.booked_seats(), 2);
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let user = User {
            id: UserId::new(),
            username: "alice".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::User,
            enabled: true,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("alice"));
    }

    #[test]
    fn ids_display_as_uuid() {
        let id = EventId::new();
        assert_eq!(id.to_string(), id.as_uuid().to_string());
    }
}
