use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::info;

use crate::api::handlers::event::{load_schedules, load_upcoming_counts};
use crate::api::dtos::requests::CreateSlotRequest;
use crate::api::dtos::responses::SlotListing;
use crate::domain::models::slot::Slot;
use crate::domain::services::constraint::SlotPolicy;
use crate::domain::services::interval::Interval;
use crate::domain::services::scheduling::{admit_candidate, Assignment};
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_slot(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(payload): Json<CreateSlotRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = state
        .event_repo
        .find_by_slug(&slug)
        .await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let now = Utc::now();
    let candidate = Interval::new(
        payload.start_time,
        payload.start_time + Duration::minutes(event.duration_min as i64),
    );

    // Resolve schedules over a padded window around the candidate so the
    // availability windows of its local day are not clamped away.
    let range = candidate.expand(Duration::days(2), Duration::days(2));
    let schedules = load_schedules(&state, &event, range).await?;
    let counts = load_upcoming_counts(&state, &event, &schedules, now).await?;
    let policy = SlotPolicy::for_event(&event);

    let assignment = admit_candidate(
        candidate,
        event.meeting_type(),
        &schedules,
        &counts,
        &policy,
        now,
    )
    .map_err(AppError::SlotRejected)?;

    let assigned_host_id = match assignment {
        Assignment::AllHosts => None,
        Assignment::Host(id) => Some(id),
    };

    let slot = Slot::new(event.id.clone(), candidate.start, candidate.end, assigned_host_id);
    let created = state.slot_repo.create(&slot).await?;
    info!("Slot created: {} for event {}", created.id, event.slug);
    Ok(Json(created))
}

pub async fn list_slots(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state
        .event_repo
        .find_by_slug(&slug)
        .await?
        .ok_or(AppError::NotFound("Event not found".into()))?;
    let slots = state.slot_repo.list_open_by_event(&event.id).await?;

    let mut listings = Vec::with_capacity(slots.len());
    for slot in slots {
        let confirmed_count = state.booking_repo.count_confirmed(&slot.id).await?;
        let waitlisted_count = state
            .booking_repo
            .list_by_slot(&slot.id)
            .await?
            .iter()
            .filter(|b| b.is_waitlisted && b.cancelled_at.is_none())
            .count() as i64;
        listings.push(SlotListing {
            slot,
            confirmed_count,
            waitlisted_count,
        });
    }
    Ok(Json(listings))
}
