//! Notification log endpoints.
//!
//! - `GET /notifications` - List notification logs with pagination (admin)

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ticketline_core::NotificationLog;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::RequireAdmin;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// One notification log entry in a listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSummary {
    /// Log entry id
    pub id: Uuid,
    /// The booking this notification refers to
    pub booking_id: Uuid,
    /// Notification message
    pub message: String,
    /// When the notification was dispatched
    pub notified_at: DateTime<Utc>,
}

impl From<NotificationLog> for NotificationSummary {
    fn from(log: NotificationLog) -> Self {
        Self {
            id: *log.id.as_uuid(),
            booking_id: *log.booking_id.as_uuid(),
            message: log.message,
            notified_at: log.notified_at,
        }
    }
}

/// Query parameters for listing notifications.
#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
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

/// Response for listing notifications.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotificationsResponse {
    /// Notification logs on this page, oldest first
    pub notifications: Vec<NotificationSummary>,
    /// Requested page
    pub page: u32,
    /// Requested page size
    pub size: u32,
    /// Total number of log entries
    pub total_elements: i64,
}

// ============================================================================
// Handlers
// ============================================================================

/// List notification logs with pagination.
///
/// Requires the admin role.
///
/// # Example
///
/// ```bash
/// curl "http://localhost:8080/notifications?page=0&size=20" \
///   -H "Authorization: Bearer <admin token>"
/// ```
pub async fn list_notifications(
    RequireAdmin(_principal): RequireAdmin,
    Query(query): Query<ListNotificationsQuery>,
    State(state): State<AppState>,
) -> Result<Json<ListNotificationsResponse>, AppError> {
    let page = state.notifications.list(query.page, query.size).await?;

    Ok(Json(ListNotificationsResponse {
        page: page.page,
        size: page.size,
        total_elements: page.total_elements,
        notifications: page
            .items
            .into_iter()
            .map(NotificationSummary::from)
            .collect(),
    }))
}
