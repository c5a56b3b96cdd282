//! Axum HTTP layer for Ticketline.
//!
//! This crate is the imperative shell around the stores in
//! `ticketline-postgres`:
//!
//! 1. **HTTP request** arrives at an Axum handler
//! 2. **Extractors** resolve the caller's [`ticketline_auth::Principal`]
//!    from the bearer token and enforce the required role
//! 3. **Handlers** validate the payload and call the store operation,
//!    threading the principal in explicitly
//! 4. **`AppError`** maps domain failures onto the HTTP status taxonomy
//! 5. For bookings, the **notification dispatcher** is handed the committed
//!    booking after the store call returns, off the request path
//!
//! # Example
//!
//! ```ignore
//! use ticketline_web::{build_router, AppState, Config};
//!
//! let config = Config::from_env();
//! let pool = ticketline_postgres::connect(&config.database.url, 10).await?;
//! let app = build_router(AppState::new(pool, &config));
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod notifier;
pub mod routes;
pub mod state;

// Re-export key types for convenience
pub use config::Config;
pub use error::AppError;
pub use extractors::{AuthUser, BearerToken, RequireAdmin, RequireUser};
pub use notifier::NotificationDispatcher;
pub use routes::build_router;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
