mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc, Weekday};
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

async fn get(app: &TestApp, uri: &str) -> axum::response::Response {
    app.router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

fn iso(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn next_monday_utc() -> DateTime<Utc> {
    let mut day = Utc::now().date_naive() + Duration::days(1);
    while day.weekday() != Weekday::Mon {
        day += Duration::days(1);
    }
    Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0).unwrap())
}

/// Creates a host with Monday hours, an event, and one open slot at Monday
/// 09:00. Returns the slot id.
async fn setup_slot(app: &TestApp, slug: &str, waitlist_enabled: bool) -> String {
    let res = post_json(
        app,
        "/api/v1/hosts",
        json!({"name": "Alice", "email": format!("alice-{}@example.com", uuid::Uuid::new_v4()), "timezone": "UTC"}),
    )
    .await;
    let host_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/v1/hosts/{}/availability", host_id))
                .header("Content-Type", "application/json")
                .body(Body::from(
                    json!({"patterns": [{"day_of_week": 1, "start_time": "09:00", "end_time": "12:00"}]})
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = post_json(
        app,
        "/api/v1/events",
        json!({
            "slug": slug,
            "title": "Workshop",
            "meeting_type": "GROUP",
            "duration_min": 60,
            "max_attendees": 1,
            "waitlist_enabled": waitlist_enabled,
            "host_ids": [host_id]
        }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = post_json(
        app,
        &format!("/api/v1/events/{}/slots", slug),
        json!({"start_time": iso(next_monday_utc() + Duration::hours(9))}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

async fn book(app: &TestApp, slot_id: &str, name: &str) -> axum::response::Response {
    post_json(
        app,
        &format!("/api/v1/slots/{}/book", slot_id),
        json!({"name": name, "email": format!("{}@example.com", name)}),
    )
    .await
}

#[tokio::test]
async fn full_slot_overflows_to_waitlist_with_contiguous_positions() {
    let app = TestApp::new().await;
    let slot_id = setup_slot(&app, "workshop", true).await;

    let res = book(&app, &slot_id, "first").await;
    assert_eq!(res.status(), StatusCode::OK);
    let first = parse_body(res).await;
    assert_eq!(first["status"], "CONFIRMED");
    assert_eq!(first["booking"]["waitlist_position"], Value::Null);

    let res = book(&app, &slot_id, "second").await;
    let second = parse_body(res).await;
    assert_eq!(second["status"], "WAITLISTED");
    assert_eq!(second["booking"]["waitlist_position"], 1);

    let res = book(&app, &slot_id, "third").await;
    let third = parse_body(res).await;
    assert_eq!(third["status"], "WAITLISTED");
    assert_eq!(third["booking"]["waitlist_position"], 2);
}

#[tokio::test]
async fn cancelling_confirmed_booking_promotes_head_and_renumbers() {
    let app = TestApp::new().await;
    let slot_id = setup_slot(&app, "promote", true).await;

    let first = parse_body(book(&app, &slot_id, "first").await).await;
    let second = parse_body(book(&app, &slot_id, "second").await).await;
    let third = parse_body(book(&app, &slot_id, "third").await).await;

    let token = first["booking"]["management_token"].as_str().unwrap();
    let res = post_json(
        &app,
        &format!("/api/v1/bookings/manage/{}/cancel", token),
        json!({}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let outcome = parse_body(res).await;

    assert!(outcome["cancelled"]["cancelled_at"].is_string());
    assert_eq!(
        outcome["promoted"]["id"].as_str().unwrap(),
        second["booking"]["id"].as_str().unwrap()
    );
    assert_eq!(outcome["promoted"]["is_waitlisted"], false);
    assert!(outcome["promoted"]["promoted_from_waitlist_at"].is_string());

    // The remaining waitlisted booking moved up to position 1.
    let third_token = third["booking"]["management_token"].as_str().unwrap();
    let res = get(&app, &format!("/api/v1/bookings/manage/{}", third_token)).await;
    let managed = parse_body(res).await;
    assert_eq!(managed["booking"]["waitlist_position"], 1);

    // Outbox rows for the whole sequence were written transactionally.
    let (promotions,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM jobs WHERE job_type = 'PROMOTION'")
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(promotions, 1);
    let (cancellations,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM jobs WHERE job_type = 'CANCELLATION'")
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(cancellations, 1);
}

#[tokio::test]
async fn cancelling_waitlisted_booking_renumbers_without_promotion() {
    let app = TestApp::new().await;
    let slot_id = setup_slot(&app, "renumber", true).await;

    parse_body(book(&app, &slot_id, "first").await).await;
    let second = parse_body(book(&app, &slot_id, "second").await).await;
    let third = parse_body(book(&app, &slot_id, "third").await).await;

    let token = second["booking"]["management_token"].as_str().unwrap();
    let res = post_json(
        &app,
        &format!("/api/v1/bookings/manage/{}/cancel", token),
        json!({}),
    )
    .await;
    let outcome = parse_body(res).await;
    assert_eq!(outcome["promoted"], Value::Null);

    let third_token = third["booking"]["management_token"].as_str().unwrap();
    let res = get(&app, &format!("/api/v1/bookings/manage/{}", third_token)).await;
    let managed = parse_body(res).await;
    assert_eq!(managed["booking"]["waitlist_position"], 1);
    assert_eq!(managed["booking"]["is_waitlisted"], true);
}

#[tokio::test]
async fn cancel_is_idempotent() {
    let app = TestApp::new().await;
    let slot_id = setup_slot(&app, "idem", true).await;

    let first = parse_body(book(&app, &slot_id, "first").await).await;
    let second = parse_body(book(&app, &slot_id, "second").await).await;
    let token = first["booking"]["management_token"].as_str().unwrap();

    let res = post_json(
        &app,
        &format!("/api/v1/bookings/manage/{}/cancel", token),
        json!({}),
    )
    .await;
    let outcome = parse_body(res).await;
    assert_eq!(
        outcome["promoted"]["id"].as_str().unwrap(),
        second["booking"]["id"].as_str().unwrap()
    );

    // Second cancel returns the already-cancelled row and promotes nobody.
    let res = post_json(
        &app,
        &format!("/api/v1/bookings/manage/{}/cancel", token),
        json!({}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let outcome = parse_body(res).await;
    assert_eq!(outcome["promoted"], Value::Null);

    let (promotions,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM jobs WHERE job_type = 'PROMOTION'")
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(promotions, 1);
}

#[tokio::test]
async fn waitlist_disabled_rejects_overflow_and_skips_promotion() {
    let app = TestApp::new().await;
    let slot_id = setup_slot(&app, "nowaitlist", false).await;

    let first = parse_body(book(&app, &slot_id, "first").await).await;
    assert_eq!(first["status"], "CONFIRMED");

    let res = book(&app, &slot_id, "second").await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let token = first["booking"]["management_token"].as_str().unwrap();
    let res = post_json(
        &app,
        &format!("/api/v1/bookings/manage/{}/cancel", token),
        json!({}),
    )
    .await;
    let outcome = parse_body(res).await;
    assert_eq!(outcome["promoted"], Value::Null);
}

#[tokio::test]
async fn confirmation_writes_outbox_jobs() {
    let app = TestApp::new().await;
    let slot_id = setup_slot(&app, "outbox", true).await;

    parse_body(book(&app, &slot_id, "first").await).await;

    let (confirmations,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM jobs WHERE job_type = 'CONFIRMATION'")
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(confirmations, 1);
    let (calendar_adds,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM jobs WHERE job_type = 'CALENDAR_ADD'")
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(calendar_adds, 1);

    parse_body(book(&app, &slot_id, "second").await).await;
    let (waitlisted,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM jobs WHERE job_type = 'WAITLISTED'")
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(waitlisted, 1);
}
