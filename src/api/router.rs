use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

use crate::api::handlers::{booking, booking_management, busy, event, health, host, slot};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Hosts & availability patterns
        .route("/api/v1/hosts", post(host::create_host).get(host::list_hosts))
        .route("/api/v1/hosts/{host_id}", get(host::get_host))
        .route(
            "/api/v1/hosts/{host_id}/availability",
            get(host::get_patterns).put(host::replace_patterns),
        )

        // Busy blocks
        .route(
            "/api/v1/hosts/{host_id}/busy",
            get(busy::list_busy_blocks).post(busy::create_busy_block),
        )
        .route("/api/v1/hosts/{host_id}/busy/sync", post(busy::sync_busy_blocks))

        // Events
        .route("/api/v1/events", post(event::create_event).get(event::list_events))
        .route("/api/v1/events/{slug}", get(event::get_event))
        .route("/api/v1/events/{slug}/availability", get(event::get_availability))
        .route(
            "/api/v1/events/{slug}/slots",
            get(slot::list_slots).post(slot::create_slot),
        )

        // Booking flow
        .route("/api/v1/slots/{slot_id}/book", post(booking::book_slot))

        // Attendee booking management
        .route(
            "/api/v1/bookings/manage/{token}",
            get(booking_management::get_booking_by_token),
        )
        .route(
            "/api/v1/bookings/manage/{token}/cancel",
            post(booking_management::cancel_booking),
        )

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!(
                        "started processing request: {} {}",
                        request.method(),
                        request.uri().path()
                    );
                })
                .on_response(
                    |response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                        info!(
                            status = response.status().as_u16(),
                            latency_ms = latency.as_millis(),
                            "finished processing request"
                        );
                    },
                )
                .on_failure(
                    |error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                        error!("request failed: {:?}", error);
                    },
                ),
        )
        .with_state(state)
}
