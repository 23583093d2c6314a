use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateEventRequest, RangeQuery};
use crate::api::dtos::responses::{AvailabilityResponse, CandidateSlot};
use crate::domain::models::event::{Event, MeetingType, NewEventParams};
use crate::domain::services::availability::{resolve_timezone, resolve_windows};
use crate::domain::services::busy::{aggregate_busy, BufferedSlot};
use crate::domain::services::constraint::SlotPolicy;
use crate::domain::services::interval::Interval;
use crate::domain::services::scheduling::{enumerate_candidates, Assignment, HostSchedule};
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let meeting_type = MeetingType::parse(&payload.meeting_type)
        .ok_or(AppError::Validation(format!(
            "Unknown meeting_type: {}",
            payload.meeting_type
        )))?;

    if payload.duration_min <= 0 {
        return Err(AppError::Validation("duration_min must be positive".into()));
    }
    if payload.max_attendees < 1 {
        return Err(AppError::Validation("max_attendees must be at least 1".into()));
    }
    if payload.min_notice_hours < 0
        || payload.booking_window_days < 0
        || payload.buffer_before_min < 0
        || payload.buffer_after_min < 0
    {
        return Err(AppError::Validation("Policy fields must not be negative".into()));
    }
    if payload.host_ids.is_empty() {
        return Err(AppError::Validation("At least one host is required".into()));
    }
    for host_id in &payload.host_ids {
        state
            .host_repo
            .find_by_id(host_id)
            .await?
            .ok_or(AppError::NotFound(format!("Host {} not found", host_id)))?;
    }

    let event = Event::new(NewEventParams {
        slug: payload.slug,
        title: payload.title,
        description: payload.description,
        location: payload.location,
        meeting_type,
        duration_min: payload.duration_min,
        max_attendees: payload.max_attendees,
        min_notice_hours: payload.min_notice_hours,
        booking_window_days: payload.booking_window_days,
        buffer_before_min: payload.buffer_before_min,
        buffer_after_min: payload.buffer_after_min,
        waitlist_enabled: payload.waitlist_enabled,
    });

    let created = state.event_repo.create(&event, &payload.host_ids).await?;
    info!("Event created: {} ({})", created.slug, created.id);
    Ok(Json(created))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_repo.list().await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state
        .event_repo
        .find_by_slug(&slug)
        .await?
        .ok_or(AppError::NotFound("Event not found".into()))?;
    Ok(Json(event))
}

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(range): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let event = state
        .event_repo
        .find_by_slug(&slug)
        .await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if range.end <= range.start {
        return Err(AppError::Validation("end must be after start".into()));
    }
    if range.end - range.start > Duration::days(92) {
        return Err(AppError::Validation("Range must not exceed 92 days".into()));
    }

    let now = Utc::now();
    let query = Interval::new(range.start, range.end);
    let schedules = load_schedules(&state, &event, query).await?;
    let counts = load_upcoming_counts(&state, &event, &schedules, now).await?;

    let policy = SlotPolicy::for_event(&event);
    let candidates = enumerate_candidates(
        event.meeting_type(),
        &schedules,
        &counts,
        &policy,
        Duration::minutes(event.duration_min as i64),
        now,
    );

    let slots = candidates
        .into_iter()
        .map(|(interval, assignment)| CandidateSlot {
            start_time: interval.start,
            end_time: interval.end,
            host_id: match assignment {
                Assignment::AllHosts => None,
                Assignment::Host(id) => Some(id),
            },
        })
        .collect();

    Ok(Json(AvailabilityResponse {
        event_id: event.id,
        slots,
    }))
}

/// Builds each participating host's resolved schedule over `range`: weekly
/// patterns expanded into UTC windows, and busy blocks merged with already
/// booked slots widened by their owning event's buffers. The busy query is
/// padded by a day on each side so buffers reaching into the range are seen.
pub async fn load_schedules(
    state: &Arc<AppState>,
    event: &Event,
    range: Interval,
) -> Result<Vec<HostSchedule>, AppError> {
    let host_ids = state.event_repo.list_host_ids(&event.id).await?;
    if host_ids.is_empty() {
        return Err(AppError::Validation("Event has no hosts".into()));
    }

    let padded = range.expand(Duration::days(1), Duration::days(1));
    let mut event_cache: HashMap<String, Event> = HashMap::new();
    event_cache.insert(event.id.clone(), event.clone());

    let mut schedules = Vec::with_capacity(host_ids.len());
    for host_id in host_ids {
        let host = state
            .host_repo
            .find_by_id(&host_id)
            .await?
            .ok_or(AppError::NotFound(format!("Host {} not found", host_id)))?;

        let patterns = state.host_repo.list_patterns(&host_id).await?;
        let tz = resolve_timezone(host.timezone.as_deref(), &state.config.default_timezone);
        let windows: Vec<Interval> = resolve_windows(&patterns, tz, range)
            .into_iter()
            .flat_map(|day| day.windows)
            .collect();

        let blocks = state
            .busy_repo
            .list_by_range(&host_id, padded.start, padded.end)
            .await?;
        let slots = state
            .slot_repo
            .list_by_host_range(&host_id, padded.start, padded.end)
            .await?;

        let mut buffered = Vec::with_capacity(slots.len());
        for slot in &slots {
            let owner = match event_cache.get(&slot.event_id) {
                Some(e) => e.clone(),
                None => {
                    let e = state
                        .event_repo
                        .find_by_id(&slot.event_id)
                        .await?
                        .ok_or(AppError::NotFound(format!(
                            "Event {} not found",
                            slot.event_id
                        )))?;
                    event_cache.insert(e.id.clone(), e.clone());
                    e
                }
            };
            buffered.push(BufferedSlot::from_slot(
                slot,
                owner.buffer_before_min,
                owner.buffer_after_min,
            ));
        }

        schedules.push(HostSchedule {
            host_id: host.id,
            windows,
            busy: aggregate_busy(&blocks, &buffered),
        });
    }

    Ok(schedules)
}

/// Upcoming open slot counts per host, used for round-robin load ranking.
/// Collective types assign every host, so no ranking is needed there.
pub async fn load_upcoming_counts(
    state: &Arc<AppState>,
    event: &Event,
    schedules: &[HostSchedule],
    now: DateTime<Utc>,
) -> Result<HashMap<String, i64>, AppError> {
    let mut counts = HashMap::new();
    if event.meeting_type().requires_all_hosts() {
        return Ok(counts);
    }
    for schedule in schedules {
        let count = state
            .slot_repo
            .count_upcoming_by_host(&schedule.host_id, now)
            .await?;
        counts.insert(schedule.host_id.clone(), count);
    }
    Ok(counts)
}
