//! Application state shared across HTTP handlers.

use sqlx::PgPool;
use ticketline_auth::TokenManager;
use ticketline_postgres::{BookingStore, EventStore, NotificationStore, UserStore};

use crate::config::Config;
use crate::notifier::NotificationDispatcher;

/// Application state shared across all HTTP handlers.
///
/// Every collaborator is constructor-passed here and cloned per request
/// (all members are cheap handles over the shared connection pool).
/// Nothing in the request path reaches for globals.
#[derive(Clone)]
pub struct AppState {
    /// Raw pool handle, used by the readiness check
    pub pool: PgPool,
    /// Credential store
    pub users: UserStore,
    /// Event store
    pub events: EventStore,
    /// Booking engine
    pub bookings: BookingStore,
    /// Notification log store (read side)
    pub notifications: NotificationStore,
    /// Bearer-token issue/verify
    pub tokens: TokenManager,
    /// Post-commit notification dispatcher
    pub notifier: NotificationDispatcher,
}

impl AppState {
    /// Wire up all stores and services over one connection pool.
    #[must_use]
    pub fn new(pool: PgPool, config: &Config) -> Self {
        let notifications = NotificationStore::new(pool.clone());
        Self {
            users: UserStore::new(pool.clone()),
            events: EventStore::new(pool.clone()),
            bookings: BookingStore::new(pool.clone(), config.booking.max_retries),
            notifier: NotificationDispatcher::new(notifications.clone()),
            notifications,
            tokens: TokenManager::new(
                &config.auth.jwt_secret,
                chrono::Duration::seconds(config.auth.token_ttl_secs),
            ),
            pool,
        }
    }
}
