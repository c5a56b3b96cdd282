//! Router configuration.
//!
//! Builds the complete Axum router with all endpoints and the
//! request-id/trace middleware stack. Role enforcement happens in the
//! handlers' extractors, so the route table stays a plain map of paths.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::handlers::{auth, bookings, events, health, notifications};
use crate::state::AppState;

/// Build the complete Axum router.
///
/// Configures all routes:
/// - Health checks (public)
/// - Registration and login (public)
/// - Event reads (public), event mutations (admin)
/// - Booking endpoints (role `user`)
/// - Notification log listing (admin)
///
/// Every request gets an `x-request-id` (propagated if the client sent
/// one) and an HTTP trace span.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health checks (no authentication)
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        // Events
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        // Bookings
        .route(
            "/bookings",
            post(bookings::create_booking).get(bookings::list_bookings),
        )
        // Notification logs
        .route("/notifications", get(notifications::list_notifications))
        // Middleware
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use sqlx::postgres::PgPoolOptions;

    /// State over a lazy pool: routing and auth rejection tests never touch
    /// the database, so no server needs to be running.
    fn test_state() -> AppState {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://nobody@127.0.0.1:1/nowhere")
            .expect("lazy pool");
        AppState::new(pool, &Config::from_env())
    }

    #[tokio::test]
    async fn health_check_is_public() {
        let server = TestServer::new(build_router(test_state())).unwrap();
        let response = server.get("/health").await;
        response.assert_status(StatusCode::OK);
        response.assert_text("ok");
    }

    #[tokio::test]
    async fn bookings_require_authentication() {
        let server = TestServer::new(build_router(test_state())).unwrap();

        let response = server.get("/bookings").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let response = server
            .post("/bookings")
            .json(&serde_json::json!({ "eventId": uuid::Uuid::new_v4(), "ticketsCount": 1 }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn notifications_require_authentication() {
        let server = TestServer::new(build_router(test_state())).unwrap();
        let response = server.get("/notifications").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_bearer_token_is_rejected() {
        let server = TestServer::new(build_router(test_state())).unwrap();
        let response = server
            .get("/bookings")
            .add_header(
                axum::http::HeaderName::from_static("authorization"),
                axum::http::HeaderValue::from_static("Bearer not-a-jwt"),
            )
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn event_mutations_require_a_token() {
        let server = TestServer::new(build_router(test_state())).unwrap();
        let response = server
            .post("/events")
            .json(&serde_json::json!({
                "name": "Concert",
                "eventDate": "2026-10-01T09:00:00Z",
                "capacity": 10
            }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn responses_carry_a_request_id() {
        let server = TestServer::new(build_router(test_state())).unwrap();
        let response = server.get("/health").await;
        assert!(response.headers().contains_key("x-request-id"));
    }
}
