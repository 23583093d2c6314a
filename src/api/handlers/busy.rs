use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateBusyBlockRequest, RangeQuery, SyncBusyRequest};
use crate::domain::models::busy::{BusyBlock, SOURCE_CALENDAR, SOURCE_MANUAL};
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_busy_block(
    State(state): State<Arc<AppState>>,
    Path(host_id): Path<String>,
    Json(payload): Json<CreateBusyBlockRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .host_repo
        .find_by_id(&host_id)
        .await?
        .ok_or(AppError::NotFound("Host not found".into()))?;

    if payload.end_time <= payload.start_time {
        return Err(AppError::Validation(
            "end_time must be after start_time".into(),
        ));
    }

    let block = BusyBlock::new(
        host_id,
        payload.start_time,
        payload.end_time,
        SOURCE_MANUAL,
    );
    let created = state.busy_repo.create(&block).await?;
    Ok(Json(created))
}

pub async fn list_busy_blocks(
    State(state): State<Arc<AppState>>,
    Path(host_id): Path<String>,
    Query(range): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    state
        .host_repo
        .find_by_id(&host_id)
        .await?
        .ok_or(AppError::NotFound("Host not found".into()))?;
    let blocks = state
        .busy_repo
        .list_by_range(&host_id, range.start, range.end)
        .await?;
    Ok(Json(blocks))
}

/// Refreshes the cached CALENDAR busy blocks for a host from the provider's
/// free/busy feed. MANUAL blocks are left alone.
pub async fn sync_busy_blocks(
    State(state): State<Arc<AppState>>,
    Path(host_id): Path<String>,
    Json(payload): Json<SyncBusyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let host = state
        .host_repo
        .find_by_id(&host_id)
        .await?
        .ok_or(AppError::NotFound("Host not found".into()))?;

    if payload.end_time <= payload.start_time {
        return Err(AppError::Validation(
            "end_time must be after start_time".into(),
        ));
    }

    let ranges = state
        .calendar_service
        .fetch_busy(&host.email, payload.start_time, payload.end_time)
        .await?;

    let blocks: Vec<BusyBlock> = ranges
        .into_iter()
        .filter(|(s, e)| e > s)
        .map(|(s, e)| BusyBlock::new(host_id.clone(), s, e, SOURCE_CALENDAR))
        .collect();

    state
        .busy_repo
        .replace_calendar_blocks(&host_id, payload.start_time, payload.end_time, &blocks)
        .await?;

    info!("Synced {} calendar busy blocks for host {}", blocks.len(), host_id);
    Ok(Json(blocks))
}
