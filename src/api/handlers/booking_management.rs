use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::responses::ManagedBookingResponse;
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_booking_by_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .booking_repo
        .find_by_token(&token)
        .await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;
    let slot = state
        .slot_repo
        .find_by_id(&booking.slot_id)
        .await?
        .ok_or(AppError::NotFound("Slot not found".into()))?;
    let event = state
        .event_repo
        .find_by_id(&slot.event_id)
        .await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    Ok(Json(ManagedBookingResponse {
        booking,
        slot,
        event,
    }))
}

/// Cancels the booking behind a management token. Cancelling an already
/// cancelled booking is a no-op that returns the same outcome shape.
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .booking_repo
        .find_by_token(&token)
        .await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;
    let slot = state
        .slot_repo
        .find_by_id(&booking.slot_id)
        .await?
        .ok_or(AppError::NotFound("Slot not found".into()))?;
    let event = state
        .event_repo
        .find_by_id(&slot.event_id)
        .await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let outcome = state
        .booking_repo
        .cancel_and_promote(&booking.id, event.waitlist_enabled)
        .await?;

    info!(
        "Booking cancelled: {} (promoted: {:?})",
        outcome.cancelled.id,
        outcome.promoted.as_ref().map(|b| b.id.clone())
    );
    Ok(Json(outcome))
}
