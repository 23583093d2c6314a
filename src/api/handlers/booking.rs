use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::BookSlotRequest;
use crate::api::dtos::responses::BookingResponse;
use crate::domain::models::{booking::Booking, job::Job, slot::SLOT_OPEN};
use crate::domain::services::constraint::RejectReason;
use crate::error::AppError;
use crate::state::AppState;

pub async fn book_slot(
    State(state): State<Arc<AppState>>,
    Path(slot_id): Path<String>,
    Json(payload): Json<BookSlotRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() || payload.email.trim().is_empty() {
        return Err(AppError::Validation("name and email are required".into()));
    }

    let slot = state
        .slot_repo
        .find_by_id(&slot_id)
        .await?
        .ok_or(AppError::NotFound("Slot not found".into()))?;
    if slot.status != SLOT_OPEN {
        return Err(AppError::Conflict("Slot is not open for booking".into()));
    }

    let event = state
        .event_repo
        .find_by_id(&slot.event_id)
        .await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let now = Utc::now();
    if slot.start_time <= now {
        return Err(AppError::Conflict("Slot has already started".into()));
    }
    if !event.meeting_type().exempt_from_min_notice()
        && slot.start_time < now + Duration::hours(event.min_notice_hours as i64)
    {
        return Err(AppError::SlotRejected(RejectReason::TooSoon));
    }

    let confirmed = state.booking_repo.count_confirmed(&slot.id).await?;

    if confirmed < event.max_attendees as i64 {
        let booking = Booking::new(slot.id.clone(), payload.name, payload.email, None);
        let jobs = vec![
            Job::new("CONFIRMATION", booking.id.clone(), now),
            Job::new("CALENDAR_ADD", booking.id.clone(), now),
        ];
        let created = state.booking_repo.create(&booking, jobs).await?;
        info!("Booking confirmed: {} for slot {}", created.id, slot.id);
        return Ok(Json(BookingResponse {
            booking: created,
            status: "CONFIRMED",
        }));
    }

    if !event.waitlist_enabled {
        return Err(AppError::Conflict("Slot is fully booked".into()));
    }

    let position = state.booking_repo.next_waitlist_position(&slot.id).await?;
    let booking = Booking::new(slot.id.clone(), payload.name, payload.email, Some(position));
    let jobs = vec![Job::new("WAITLISTED", booking.id.clone(), now)];
    let created = state.booking_repo.create(&booking, jobs).await?;
    info!(
        "Booking waitlisted at position {}: {} for slot {}",
        position, created.id, slot.id
    );
    Ok(Json(BookingResponse {
        booking: created,
        status: "WAITLISTED",
    }))
}
