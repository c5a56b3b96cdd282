//! Error taxonomy for booking, event and account operations.

use thiserror::Error;

use crate::types::EventId;

/// Result type alias for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;

/// Comprehensive error taxonomy for the booking system.
///
/// Variants are grouped by how they surface at the HTTP boundary: not-found,
/// business-rule violations, transient concurrency conflicts, and storage
/// failures. The web layer translates each group into its status class; the
/// predicates below drive that mapping.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ═══════════════════════════════════════════════════════════
    // Not Found
    // ═══════════════════════════════════════════════════════════

    /// Referenced event does not exist.
    #[error("Event {0} not found")]
    EventNotFound(EventId),

    /// Referenced user does not exist.
    #[error("User not found")]
    UserNotFound,

    // ═══════════════════════════════════════════════════════════
    // Business Rule Violations
    // ═══════════════════════════════════════════════════════════

    /// Not enough seats left on the event for the requested booking.
    #[error("Insufficient seats: requested {requested}, available {available}")]
    InsufficientSeats {
        /// Tickets requested by the caller
        requested: i32,
        /// Seats actually available at check time
        available: i32,
    },

    /// Username is already registered.
    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    /// Wrong username/password combination.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Account exists but has been disabled.
    #[error("Account is disabled")]
    AccountDisabled,

    /// Ticket count must be a positive integer.
    #[error("Invalid ticket count: {0}")]
    InvalidTicketCount(i32),

    /// Event capacity must be non-negative.
    #[error("Invalid capacity: {0}")]
    InvalidCapacity(i32),

    /// A capacity update would drop capacity below seats already booked.
    #[error("Capacity {capacity} is below the {booked} seats already booked")]
    CapacityBelowBooked {
        /// Requested new capacity
        capacity: i32,
        /// Seats already committed to bookings
        booked: i32,
    },

    /// Request payload failed validation.
    #[error("Validation failed: {0}")]
    Validation(String),

    // ═══════════════════════════════════════════════════════════
    // Transient Failures
    // ═══════════════════════════════════════════════════════════

    /// Serializable-transaction conflict persisted through the retry budget.
    ///
    /// The request did not change any state and may be retried by the
    /// caller; this is deliberately distinct from capacity exhaustion.
    #[error("Booking conflict persisted after {attempts} attempts, please retry")]
    ConcurrencyConflict {
        /// Number of transaction attempts made before giving up
        attempts: u32,
    },

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// Storage operation failed. Detail is logged, not shown to callers.
    #[error("Database error: {0}")]
    Database(String),
}

impl DomainError {
    /// Returns `true` if this error is due to invalid caller input or a
    /// violated business rule (400-class at the HTTP boundary).
    ///
    /// # Examples
    ///
    /// ```
    /// # use ticketline_core::DomainError;
    /// assert!(DomainError::InvalidCredentials.is_user_error());
    /// assert!(!DomainError::Database("boom".into()).is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InsufficientSeats { .. }
                | Self::UsernameTaken(_)
                | Self::InvalidCredentials
                | Self::AccountDisabled
                | Self::InvalidTicketCount(_)
                | Self::InvalidCapacity(_)
                | Self::CapacityBelowBooked { .. }
                | Self::Validation(_)
        )
    }

    /// Returns `true` if the referenced entity was absent (404-class).
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::EventNotFound(_) | Self::UserNotFound)
    }

    /// Returns `true` if the caller may retry the exact same request.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ticketline_core::DomainError;
    /// assert!(DomainError::ConcurrencyConflict { attempts: 3 }.is_retryable());
    /// assert!(!(DomainError::InsufficientSeats { requested: 2, available: 1 }).is_retryable());
    /// ```
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventId;

    #[test]
    fn not_found_is_not_user_error() {
        let err = DomainError::EventNotFound(EventId::new());
        assert!(err.is_not_found());
        assert!(!err.is_user_error());
        assert!(!err.is_retryable());
    }

    #[test]
    fn insufficient_seats_is_user_error() {
        let err = DomainError::InsufficientSeats {
            requested: 5,
            available: 2,
        };
        assert!(err.is_user_error());
        assert!(!err.is_not_found());
    }

    #[test]
    fn conflict_is_retryable_only() {
        let err = DomainError::ConcurrencyConflict { attempts: 3 };
        assert!(err.is_retryable());
        assert!(!err.is_user_error());
        assert!(!err.is_not_found());
    }

    #[test]
    fn display_messages() {
        let err = DomainError::InsufficientSeats {
            requested: 2,
            available: 1,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient seats: requested 2, available 1"
        );
    }
}
