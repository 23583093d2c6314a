mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{DateTime, Duration, Timelike, Utc};
use common::TestApp;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_json(app: &TestApp, uri: &str, payload: Value) -> axum::response::Response {
    app.router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

fn iso(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Host available around the clock, every day, so only the policy under test
/// decides the outcome.
async fn create_always_available_host(app: &TestApp) -> String {
    let res = post_json(
        app,
        "/api/v1/hosts",
        json!({"name": "Alice", "email": format!("alice-{}@example.com", uuid::Uuid::new_v4()), "timezone": "UTC"}),
    )
    .await;
    let host_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let patterns: Vec<Value> = (0..7)
        .map(|dow| json!({"day_of_week": dow, "start_time": "00:00", "end_time": "23:59"}))
        .collect();
    let res = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/v1/hosts/{}/availability", host_id))
                .header("Content-Type", "application/json")
                .body(Body::from(json!({ "patterns": patterns }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    host_id
}

/// A start a few days out, on the hour, comfortably inside the daily
/// 00:00-23:59 pattern window.
fn aligned_start(days_out: i64) -> DateTime<Utc> {
    (Utc::now() + Duration::days(days_out))
        .with_minute(0)
        .unwrap()
        .with_second(0)
        .unwrap()
        .with_nanosecond(0)
        .unwrap()
        .with_hour(10)
        .unwrap()
}

#[tokio::test]
async fn slot_inside_min_notice_is_rejected_as_too_soon() {
    let app = TestApp::new().await;
    let host_id = create_always_available_host(&app).await;

    post_json(
        &app,
        "/api/v1/events",
        json!({
            "slug": "notice",
            "title": "T",
            "meeting_type": "ONE_ON_ONE",
            "duration_min": 60,
            "min_notice_hours": 72,
            "host_ids": [host_id]
        }),
    )
    .await;

    let res = post_json(
        &app,
        "/api/v1/events/notice/slots",
        json!({"start_time": iso(aligned_start(2))}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(res).await;
    assert_eq!(body["reason"], "TOO_SOON");

    // Past the notice threshold the same event admits the slot.
    let res = post_json(
        &app,
        "/api/v1/events/notice/slots",
        json!({"start_time": iso(aligned_start(4))}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn webinar_is_exempt_from_min_notice() {
    let app = TestApp::new().await;
    let host_id = create_always_available_host(&app).await;

    post_json(
        &app,
        "/api/v1/events",
        json!({
            "slug": "townhall",
            "title": "Town hall",
            "meeting_type": "WEBINAR",
            "duration_min": 60,
            "min_notice_hours": 72,
            "max_attendees": 500,
            "host_ids": [host_id]
        }),
    )
    .await;

    let res = post_json(
        &app,
        "/api/v1/events/townhall/slots",
        json!({"start_time": iso(aligned_start(1))}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn slot_beyond_booking_window_is_rejected() {
    let app = TestApp::new().await;
    let host_id = create_always_available_host(&app).await;

    post_json(
        &app,
        "/api/v1/events",
        json!({
            "slug": "windowed",
            "title": "T",
            "meeting_type": "ONE_ON_ONE",
            "duration_min": 60,
            "booking_window_days": 30,
            "host_ids": [host_id]
        }),
    )
    .await;

    let res = post_json(
        &app,
        "/api/v1/events/windowed/slots",
        json!({"start_time": iso(aligned_start(40))}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(res).await;
    assert_eq!(body["reason"], "OUTSIDE_WINDOW");
}

#[tokio::test]
async fn busy_overlap_is_rejected_as_conflict() {
    let app = TestApp::new().await;
    let host_id = create_always_available_host(&app).await;

    post_json(
        &app,
        "/api/v1/events",
        json!({
            "slug": "clash",
            "title": "T",
            "meeting_type": "ONE_ON_ONE",
            "duration_min": 60,
            "host_ids": [host_id]
        }),
    )
    .await;

    let start = aligned_start(3);
    post_json(
        &app,
        &format!("/api/v1/hosts/{}/busy", host_id),
        json!({
            "start_time": iso(start + Duration::minutes(30)),
            "end_time": iso(start + Duration::minutes(90))
        }),
    )
    .await;

    let res = post_json(
        &app,
        "/api/v1/events/clash/slots",
        json!({"start_time": iso(start)}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(res).await;
    assert_eq!(body["reason"], "CONFLICT");
}

#[tokio::test]
async fn buffer_boundary_admits_exactly_touching_candidate() {
    let app = TestApp::new().await;
    let host_id = create_always_available_host(&app).await;

    post_json(
        &app,
        "/api/v1/events",
        json!({
            "slug": "buffered",
            "title": "T",
            "meeting_type": "ONE_ON_ONE",
            "duration_min": 20,
            "buffer_after_min": 10,
            "host_ids": [host_id]
        }),
    )
    .await;

    let day = aligned_start(3);
    // Busy 14:00-14:30 relative to the aligned 10:00 anchor.
    let busy_start = day + Duration::hours(4);
    post_json(
        &app,
        &format!("/api/v1/hosts/{}/busy", host_id),
        json!({
            "start_time": iso(busy_start),
            "end_time": iso(busy_start + Duration::minutes(30))
        }),
    )
    .await;

    // Starting a minute past the touching point, the 10min buffer pushes the
    // envelope into the busy block.
    let res = post_json(
        &app,
        "/api/v1/events/buffered/slots",
        json!({"start_time": iso(busy_start - Duration::minutes(29))}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(res).await;
    assert_eq!(body["reason"], "CONFLICT");

    // 13:30-13:50 plus the 10min buffer ends exactly at the busy start:
    // the boundary itself is admitted.
    let res = post_json(
        &app,
        "/api/v1/events/buffered/slots",
        json!({"start_time": iso(busy_start - Duration::minutes(30))}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn booking_an_existing_slot_rechecks_notice() {
    let app = TestApp::new().await;
    let host_id = create_always_available_host(&app).await;

    post_json(
        &app,
        "/api/v1/events",
        json!({
            "slug": "latecheck",
            "title": "T",
            "meeting_type": "ONE_ON_ONE",
            "duration_min": 60,
            "min_notice_hours": 96,
            "host_ids": [host_id]
        }),
    )
    .await;

    let res = post_json(
        &app,
        "/api/v1/events/latecheck/slots",
        json!({"start_time": iso(aligned_start(5))}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let slot_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    // 5 days out is beyond the 96h notice, so booking succeeds.
    let res = post_json(
        &app,
        &format!("/api/v1/slots/{}/book", slot_id),
        json!({"name": "n", "email": "n@example.com"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}
