//! Event management endpoints.
//!
//! - `POST /events` - Create an event (admin)
//! - `GET /events` - List events with pagination (public)
//! - `GET /events/:id` - Get event details (public)
//! - `PUT /events/:id` - Update an event (admin)
//! - `DELETE /events/:id` - Delete an event (admin)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ticketline_core::{Event, EventId, EventUpdate, NewEvent};
use ticketline_postgres::EventSort;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::RequireAdmin;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to create a new event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    /// Event name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// When the event takes place
    pub event_date: DateTime<Utc>,
    /// Total seat capacity
    pub capacity: i32,
}

/// Request to update an event (full replacement).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    /// New event name
    pub name: String,
    /// New description
    pub description: Option<String>,
    /// New event date
    pub event_date: DateTime<Utc>,
    /// New total capacity; seats already booked are preserved
    pub capacity: i32,
}

/// Event details.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    /// Event id
    pub id: Uuid,
    /// Event name
    pub name: String,
    /// Description
    pub description: Option<String>,
    /// When the event takes place
    pub event_date: DateTime<Utc>,
    /// Total seat capacity
    pub capacity: i32,
    /// Seats still available
    pub available_seats: i32,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: *event.id.as_uuid(),
            name: event.name,
            description: event.description,
            event_date: event.event_date,
            capacity: event.capacity,
            available_seats: event.available_seats,
        }
    }
}

/// Event details plus a confirmation message, for mutations.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMutationResponse {
    /// The event after the mutation
    #[serde(flatten)]
    pub event: EventResponse,
    /// Confirmation message
    pub message: String,
}

/// Query parameters for listing events.
#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    /// Page number (0-indexed)
    #[serde(default)]
    pub page: u32,
    /// Page size (default 20, max 100)
    #[serde(default = "default_page_size")]
    pub size: u32,
    /// Sort key: `name`, `date` or `created_at` (default)
    pub sort: Option<String>,
}

const fn default_page_size() -> u32 {
    ticketline_core::page::DEFAULT_PAGE_SIZE
}

/// Response for listing events.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsResponse {
    /// Events on this page
    pub events: Vec<EventResponse>,
    /// Requested page
    pub page: u32,
    /// Requested page size
    pub size: u32,
    /// Total number of events
    pub total_elements: i64,
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a new event.
///
/// Requires the admin role. `availableSeats` starts equal to `capacity`.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/events \
///   -H "Authorization: Bearer <token>" \
///   -H "Content-Type: application/json" \
///   -d '{
///     "name": "Tech Conference 2026",
///     "description": "Annual technology conference",
///     "eventDate": "2026-10-01T09:00:00Z",
///     "capacity": 500
///   }'
/// ```
pub async fn create_event(
    RequireAdmin(principal): RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventMutationResponse>), AppError> {
    let event = state
        .events
        .create(NewEvent {
            name: request.name,
            description: request.description,
            event_date: request.event_date,
            capacity: request.capacity,
        })
        .await?;

    tracing::info!(event_id = %event.id, admin = %principal.username, "Event created");

    Ok((
        StatusCode::CREATED,
        Json(EventMutationResponse {
            event: event.into(),
            message: "Event created successfully.".to_string(),
        }),
    ))
}

/// Get event details by id.
///
/// Public endpoint, no authentication required.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/events/550e8400-e29b-41d4-a716-446655440000
/// ```
pub async fn get_event(
    Path(event_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<EventResponse>, AppError> {
    let event = state.events.get(EventId::from_uuid(event_id)).await?;
    Ok(Json(event.into()))
}

/// List events with pagination.
///
/// Public endpoint, no authentication required.
///
/// # Example
///
/// ```bash
/// curl "http://localhost:8080/events?page=0&size=20&sort=name"
/// ```
pub async fn list_events(
    Query(query): Query<ListEventsQuery>,
    State(state): State<AppState>,
) -> Result<Json<ListEventsResponse>, AppError> {
    let sort = EventSort::from_param(query.sort.as_deref());
    let page = state.events.list(query.page, query.size, sort).await?;

    Ok(Json(ListEventsResponse {
        page: page.page,
        size: page.size,
        total_elements: page.total_elements,
        events: page.items.into_iter().map(EventResponse::from).collect(),
    }))
}

/// Update an event.
///
/// Requires the admin role. The seat counter is reconciled against booked
/// seats inside the same locked transaction the booking engine uses, so a
/// capacity change can never race a booking into overselling; shrinking
/// below the booked count fails with 400.
pub async fn update_event(
    RequireAdmin(principal): RequireAdmin,
    Path(event_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<EventMutationResponse>, AppError> {
    let event = state
        .events
        .update(
            EventId::from_uuid(event_id),
            EventUpdate {
                name: request.name,
                description: request.description,
                event_date: request.event_date,
                capacity: request.capacity,
            },
        )
        .await?;

    tracing::info!(event_id = %event.id, admin = %principal.username, "Event updated");

    Ok(Json(EventMutationResponse {
        event: event.into(),
        message: "Event updated successfully.".to_string(),
    }))
}

/// Delete an event.
///
/// Requires the admin role. Responds 200 with a message when a row was
/// deleted and 204 when there was nothing to delete.
pub async fn delete_event(
    RequireAdmin(principal): RequireAdmin,
    Path(event_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let deleted = state.events.delete(EventId::from_uuid(event_id)).await?;

    if deleted {
        tracing::info!(event_id = %event_id, admin = %principal.username, "Event deleted");
        Ok((
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Event deleted successfully." })),
        )
            .into_response())
    } else {
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
