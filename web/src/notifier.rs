//! Post-commit notification dispatch.
//!
//! The booking handler calls [`NotificationDispatcher::dispatch`] only
//! after the booking transaction has committed, and never on a rollback.
//! Dispatch spawns its own task so the HTTP response returns without
//! waiting, and a failed insert is strictly a background problem: it is
//! logged and counted, never surfaced to the booking caller, and not
//! retried.

use ticketline_core::Booking;
use ticketline_postgres::NotificationStore;
use tokio::task::JoinHandle;

/// Message recorded for every booking notification.
const NOTIFICATION_MESSAGE: &str = "Booking notification sent";

/// Fire-and-forget writer of notification log entries.
#[derive(Clone)]
pub struct NotificationDispatcher {
    store: NotificationStore,
}

impl NotificationDispatcher {
    /// Create a dispatcher over the notification store.
    #[must_use]
    pub const fn new(store: NotificationStore) -> Self {
        Self { store }
    }

    /// Schedule the notification log entry for a committed booking.
    ///
    /// Returns the task handle so tests can await completion; production
    /// callers drop it. Multiple dispatches run concurrently and may land
    /// in any order relative to each other.
    pub fn dispatch(&self, booking: &Booking) -> JoinHandle<()> {
        let store = self.store.clone();
        let booking_id = booking.id;

        tokio::spawn(async move {
            match store.insert(booking_id, NOTIFICATION_MESSAGE).await {
                Ok(log) => {
                    tracing::debug!(
                        booking_id = %booking_id,
                        notification_id = %log.id,
                        "Notification dispatched"
                    );
                }
                Err(e) => {
                    // The booking already succeeded; this failure stays in
                    // the background path.
                    metrics::counter!("notifications.dispatch_failed").increment(1);
                    tracing::error!(
                        booking_id = %booking_id,
                        error = %e,
                        "Failed to persist notification log"
                    );
                }
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::postgres::PgPoolOptions;
    use ticketline_core::{BookingId, EventId, UserId};

    #[tokio::test]
    async fn dispatch_failure_does_not_propagate() {
        // A lazy pool to an unreachable server: the insert fails at
        // runtime, which must be absorbed by the dispatch task.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://nobody@127.0.0.1:1/nowhere")
            .expect("lazy pool");
        let dispatcher = NotificationDispatcher::new(NotificationStore::new(pool));

        let booking = Booking {
            id: BookingId::new(),
            user_id: UserId::new(),
            event_id: EventId::new(),
            booking_date: Utc::now(),
            tickets_count: 1,
        };

        // The task runs to completion without panicking even though the
        // underlying insert errors.
        dispatcher.dispatch(&booking).await.expect("task completed");
    }
}
