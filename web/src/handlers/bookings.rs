//! Booking endpoints.
//!
//! - `POST /bookings` - Book tickets on an event (role `user`)
//! - `GET /bookings` - List bookings with pagination (role `user`)
//!
//! # Booking Flow
//!
//! 1. The extractor resolves and authorizes the caller
//! 2. `BookingStore::book` runs the locked check-and-decrement transaction
//! 3. Only once that commit has returned is the notification dispatcher
//!    handed the booking; its work happens off the request path
//! 4. The response reports the committed booking
//!
//! A failed booking (absent event, insufficient seats, exhausted retry
//! budget) returns before step 3, so no notification is ever scheduled for
//! a rolled-back transaction.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ticketline_core::{Booking, EventId};
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::RequireUser;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to book tickets.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    /// Event to book against
    pub event_id: Uuid,
    /// Number of tickets, must be positive
    pub tickets_count: i32,
}

/// Response after a successful booking.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    /// Booking id
    pub id: Uuid,
    /// Event booked against
    pub event_id: Uuid,
    /// When the booking was committed
    pub booking_date: DateTime<Utc>,
    /// Tickets reserved
    pub tickets_count: i32,
    /// Confirmation message
    pub message: String,
}

/// One booking in a listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    /// Booking id
    pub id: Uuid,
    /// Event booked against
    pub event_id: Uuid,
    /// When the booking was committed
    pub booking_date: DateTime<Utc>,
    /// Tickets reserved
    pub tickets_count: i32,
}

impl From<Booking> for BookingSummary {
    fn from(booking: Booking) -> Self {
        Self {
            id: *booking.id.as_uuid(),
            event_id: *booking.event_id.as_uuid(),
            booking_date: booking.booking_date,
            tickets_count: booking.tickets_count,
        }
    }
}

/// Query parameters for listing bookings.
#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    /// Page number (0-indexed)
    #[serde(default)]
    pub page: u32,
    /// Page size (default 20, max 100)
    #[serde(default = "default_page_size")]
    pub size: u32,
}

const fn default_page_size() -> u32 {
    ticketline_core::page::DEFAULT_PAGE_SIZE
}

/// Response for listing bookings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBookingsResponse {
    /// Bookings on this page, in creation order
    pub bookings: Vec<BookingSummary>,
    /// Requested page
    pub page: u32,
    /// Requested page size
    pub size: u32,
    /// Total number of bookings
    pub total_elements: i64,
}

// ============================================================================
// Handlers
// ============================================================================

/// Book tickets on an event.
///
/// Requires the `user` role. Returns 404 if the event does not exist, 400
/// if fewer seats are available than requested, and 409 if the transaction
/// kept conflicting past the retry budget (the caller may retry that one).
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/bookings \
///   -H "Authorization: Bearer <token>" \
///   -H "Content-Type: application/json" \
///   -d '{
///     "eventId": "550e8400-e29b-41d4-a716-446655440000",
///     "ticketsCount": 2
///   }'
/// ```
///
/// Response:
/// ```json
/// {
///   "id": "660e8400-e29b-41d4-a716-446655440001",
///   "eventId": "550e8400-e29b-41d4-a716-446655440000",
///   "bookingDate": "2026-08-01T12:00:00Z",
///   "ticketsCount": 2,
///   "message": "Booking completed successfully."
/// }
/// ```
pub async fn create_booking(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let booking = state
        .bookings
        .book(
            EventId::from_uuid(request.event_id),
            request.tickets_count,
            principal.user_id,
        )
        .await?;

    // The transaction above has committed; schedule the notification log
    // without holding up the response. Rolled-back bookings return early
    // via `?` and never reach this point.
    drop(state.notifier.dispatch(&booking));

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            id: *booking.id.as_uuid(),
            event_id: *booking.event_id.as_uuid(),
            booking_date: booking.booking_date,
            tickets_count: booking.tickets_count,
            message: "Booking completed successfully.".to_string(),
        }),
    ))
}

/// List bookings with pagination, oldest first.
///
/// # Example
///
/// ```bash
/// curl "http://localhost:8080/bookings?page=0&size=20" \
///   -H "Authorization: Bearer <token>"
/// ```
pub async fn list_bookings(
    RequireUser(_principal): RequireUser,
    Query(query): Query<ListBookingsQuery>,
    State(state): State<AppState>,
) -> Result<Json<ListBookingsResponse>, AppError> {
    let page = state.bookings.list(query.page, query.size).await?;

    Ok(Json(ListBookingsResponse {
        page: page.page,
        size: page.size,
        total_elements: page.total_elements,
        bookings: page.items.into_iter().map(BookingSummary::from).collect(),
    }))
}
